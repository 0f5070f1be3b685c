#![allow(dead_code)]

use std::{
    collections::HashMap,
    io,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::subscriber::DefaultGuard;

/// Canned content served by [`spawn_content_api`].
#[derive(Debug, Clone, Default)]
pub struct ContentFixture {
    /// Raw JSON bodies keyed by page id. Unknown pages get `[]`.
    pub banners: HashMap<String, String>,
    pub games: Value,
    pub plays: Arc<Mutex<Vec<String>>>,
    /// Answer `/api/banners` with a 500.
    pub banners_down: bool,
}

impl ContentFixture {
    pub fn with_page(mut self, page: &str, body: &str) -> Self {
        self.banners.insert(page.to_string(), body.to_string());
        self
    }

    pub fn with_games(mut self, games: Value) -> Self {
        self.games = games;
        self
    }

    pub fn banners_down(mut self) -> Self {
        self.banners_down = true;
        self
    }
}

#[derive(Debug)]
pub struct TestServer {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn banners(
    State(fixture): State<ContentFixture>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    if fixture.banners_down {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable".into());
    }
    match params.get("page") {
        Some(page) => (
            StatusCode::OK,
            fixture.banners.get(page).cloned().unwrap_or_else(|| "[]".into()),
        ),
        None => (StatusCode::BAD_REQUEST, "missing page".into()),
    }
}

async fn games(State(fixture): State<ContentFixture>) -> Json<Value> {
    let games = if fixture.games.is_null() {
        json!([])
    } else {
        fixture.games.clone()
    };
    Json(games)
}

async fn play(State(fixture): State<ContentFixture>, Path(id): Path<String>) -> StatusCode {
    fixture.plays.lock().unwrap().push(id);
    StatusCode::NO_CONTENT
}

/// Serves `/api/banners`, `/api/games` and `/api/games/{id}/play` on an
/// ephemeral port.
pub async fn spawn_content_api(fixture: ContentFixture) -> Result<TestServer> {
    let router = Router::new()
        .route("/api/banners", get(banners))
        .route("/api/games", get(games))
        .route("/api/games/{id}/play", post(play))
        .with_state(fixture);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind test listener")?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(TestServer { addr, handle })
}

/// Base URL of a port nothing listens on.
pub async fn refused_base_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

/// In-memory sink for formatted log lines.
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Routes this thread's `tracing` output into the capture until the
    /// guard drops.
    pub fn install(&self) -> DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
