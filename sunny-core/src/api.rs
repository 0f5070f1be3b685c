//! HTTP access to the site's content API.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use sunny_model::{Banner, Game, OpaqueId, PageId};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base URL '{url}'")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to create HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("invalid JSON from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read access to banners, scoped per page.
#[async_trait]
pub trait BannerSource: Send + Sync + Debug {
    async fn fetch_banners(&self, page: &PageId) -> ApiResult<Vec<Banner>>;
}

/// Game directory endpoints.
#[async_trait]
pub trait GameSource: Send + Sync + Debug {
    async fn fetch_games(&self) -> ApiResult<Vec<Game>>;

    /// Play-count increment. The response body carries nothing of interest.
    async fn record_play(&self, game_id: &OpaqueId) -> ApiResult<()>;
}

#[async_trait]
impl<T: BannerSource + ?Sized> BannerSource for Arc<T> {
    async fn fetch_banners(&self, page: &PageId) -> ApiResult<Vec<Banner>> {
        (**self).fetch_banners(page).await
    }
}

#[async_trait]
impl<T: GameSource + ?Sized> GameSource for Arc<T> {
    async fn fetch_games(&self) -> ApiResult<Vec<Game>> {
        (**self).fetch_games().await
    }

    async fn record_play(&self, game_id: &OpaqueId) -> ApiResult<()> {
        (**self).record_play(game_id).await
    }
}

/// Client for the public, unauthenticated content endpoints.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url.into());
        Url::parse(&base_url).map_err(|source| ApiError::InvalidBaseUrl {
            url: base_url.clone(),
            source,
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;

        debug!(base_url = %base_url, timeout = ?timeout, "api client created");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let body = self.send(&url, request).await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })
    }

    /// Sends `request`, returning the body of a successful response.
    async fn send(&self, url: &str, request: RequestBuilder) -> ApiResult<String> {
        let transport = |source| ApiError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::Status {
                url: url.to_string(),
                status,
                body,
            })
        }
    }
}

#[async_trait]
impl BannerSource for ApiClient {
    async fn fetch_banners(&self, page: &PageId) -> ApiResult<Vec<Banner>> {
        let url = self.build_url("/api/banners");
        debug!(url = %url, page = %page, "GET banners");
        let request = self.client.get(&url).query(&[("page", page.as_str())]);
        self.get_json(url, request).await
    }
}

#[async_trait]
impl GameSource for ApiClient {
    async fn fetch_games(&self) -> ApiResult<Vec<Game>> {
        let url = self.build_url("/api/games");
        debug!(url = %url, "GET games");
        let request = self.client.get(&url);
        self.get_json(url, request).await
    }

    async fn record_play(&self, game_id: &OpaqueId) -> ApiResult<()> {
        let encoded = urlencoding::encode(&game_id.to_string()).into_owned();
        let url = self.build_url(&format!("/api/games/{encoded}/play"));
        debug!(url = %url, "POST play");
        let request = self.client.post(&url);
        self.send(&url, request).await.map(|_| ())
    }
}

/// Adds `http://` when no scheme is given and drops trailing slashes.
fn normalize_base_url(raw: String) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    if normalized != raw {
        warn!(from = %raw, to = %normalized, "normalized API base URL");
    }
    normalized
}
