#[path = "support/mod.rs"]
mod support;

use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;
use sunny_core::{ApiClient, ApiError, BannerSource, GameSource, api::DEFAULT_TIMEOUT};
use sunny_model::{OpaqueId, PageId};
use support::{ContentFixture, spawn_content_api};

#[tokio::test]
async fn banners_are_scoped_by_page_query() -> Result<()> {
    let server = spawn_content_api(
        ContentFixture::default()
            .with_page("advertisement", r#"[{"image_url":"ad.png","alt_text":"Ad"}]"#)
            .with_page("warehouse", r#"[{"image_url":"w.png"},{"image_url":"w2.png"}]"#),
    )
    .await?;
    let client = ApiClient::new(format!("{}/", server.base_url()), DEFAULT_TIMEOUT)?;

    let ads = client.fetch_banners(&PageId::new("advertisement")).await?;
    assert_eq!(ads.len(), 1);
    assert_eq!(ads[0].alt_text.as_deref(), Some("Ad"));

    let warehouse = client.fetch_banners(&PageId::new("warehouse")).await?;
    assert_eq!(warehouse.len(), 2);

    assert!(client.fetch_banners(&PageId::new("unknown")).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn games_are_listed_and_plays_recorded() -> Result<()> {
    let fixture = ContentFixture::default().with_games(json!([
        {"id": 1, "title": "Dumpling Dash", "play_url": "/play/1"},
        {"id": "tea tower", "title": "Tea Tower", "play_url": "/play/2", "description": null}
    ]));
    let plays = fixture.plays.clone();
    let server = spawn_content_api(fixture).await?;
    let client = ApiClient::new(server.base_url(), Duration::from_secs(5))?;

    let games = client.fetch_games().await?;
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].id, OpaqueId::Int(1));
    assert_eq!(games[1].id, OpaqueId::from("tea tower"));

    client.record_play(&games[1].id).await?;
    assert_eq!(*plays.lock().unwrap(), vec!["tea tower".to_string()]);
    Ok(())
}

#[tokio::test]
async fn non_success_status_carries_body() -> Result<()> {
    let server = spawn_content_api(ContentFixture::default().banners_down()).await?;
    let client = ApiClient::new(server.base_url(), DEFAULT_TIMEOUT)?;

    let err = client
        .fetch_banners(&PageId::new("advertisement"))
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, body, .. } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "database unavailable");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn missing_route_is_a_status_error() -> Result<()> {
    let server = spawn_content_api(ContentFixture::default()).await?;
    let client = ApiClient::new(format!("{}/nested", server.base_url()), DEFAULT_TIMEOUT)?;

    match client.fetch_games().await {
        Err(ApiError::Status { status, url, .. }) => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(url.ends_with("/nested/api/games"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    Ok(())
}
