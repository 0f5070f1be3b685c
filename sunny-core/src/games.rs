//! Game directory: lists `/api/games` and forwards play clicks.
//!
//! Unlike the banner carousel, a failed load is shown to the visitor with a
//! retry button, and [`GameDirectory::retry`] simply runs the load again.

use std::sync::Arc;

use sunny_model::{Game, OpaqueId};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    api::GameSource,
    dom::{Document, Element, Selector},
    error::{SyncError, SyncResult},
};

pub const GAME_LIST_SELECTOR: &str = "#game-list";
pub const EMPTY_MESSAGE: &str = "目前沒有遊戲";
pub const ERROR_MESSAGE: &str = "遊戲載入失敗，請稍後再試";
pub const RETRY_LABEL: &str = "重試";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryState {
    Idle,
    Loaded { games: usize },
    Empty,
    Failed { message: String },
}

#[derive(Debug)]
pub struct GameDirectory<S> {
    source: Arc<S>,
    document: Document,
    list: Selector,
    state: DirectoryState,
}

impl<S> GameDirectory<S>
where
    S: GameSource + 'static,
{
    pub fn mount(document: Document, source: Arc<S>) -> SyncResult<Self> {
        let list = Selector::parse(GAME_LIST_SELECTOR)?;
        if document.find(&list).is_none() {
            return Err(SyncError::MissingAnchor {
                selector: list.to_string(),
            });
        }
        Ok(Self {
            source,
            document,
            list,
            state: DirectoryState::Idle,
        })
    }

    /// Skeleton page holding an empty `#game-list`.
    pub fn shell() -> Document {
        Document::from_body(
            Element::new("body").with_child(Element::new("div").with_id("game-list")),
        )
    }

    pub async fn load(&mut self) -> &DirectoryState {
        let (content, state) = match self.source.fetch_games().await {
            Ok(games) if games.is_empty() => {
                info!("game directory is empty");
                (
                    vec![Element::new("p").with_class("empty-state").with_text(EMPTY_MESSAGE)],
                    DirectoryState::Empty,
                )
            }
            Ok(games) => {
                info!(games = games.len(), "game directory loaded");
                (
                    games.iter().map(render_game_card).collect(),
                    DirectoryState::Loaded { games: games.len() },
                )
            }
            Err(err) => {
                warn!(error = %err, "failed to load game directory");
                (vec![render_error()], DirectoryState::Failed {
                    message: err.to_string(),
                })
            }
        };

        if let Some(list) = self.document.find_mut(&self.list) {
            list.clear_children();
            for element in content {
                list.push_child(element);
            }
        }
        self.state = state;
        &self.state
    }

    /// Handler of the retry button.
    pub async fn retry(&mut self) -> &DirectoryState {
        debug!("retrying game directory load");
        self.load().await
    }

    /// Records a play without waiting for the server. Failures are logged
    /// and dropped; the handle is only useful to tests and shutdown code.
    pub fn play(&self, game_id: OpaqueId) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            if let Err(err) = source.record_play(&game_id).await {
                warn!(game = %game_id, error = %err, "failed to record play");
            }
        })
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn list_html(&self) -> String {
        self.document
            .find(&self.list)
            .map(|list| list.to_html())
            .unwrap_or_default()
    }
}

pub fn render_game_card(game: &Game) -> Element {
    let mut card = Element::new("div")
        .with_class("game-card")
        .with_attr("data-game-id", game.id.to_string());

    if let Some(image_url) = game.image_url.as_deref().filter(|url| !url.is_empty()) {
        card.push_child(
            Element::new("img")
                .with_attr("src", image_url)
                .with_attr("alt", game.title.as_str()),
        );
    }
    card.push_child(Element::new("h3").with_text(game.title.as_str()));
    if let Some(description) = game.description.as_deref().filter(|d| !d.is_empty()) {
        card.push_child(Element::new("p").with_text(description));
    }
    card.with_child(
        Element::new("a")
            .with_class("play-button")
            .with_attr("href", game.play_url.as_str())
            .with_attr("data-game-id", game.id.to_string())
            .with_text("Play"),
    )
}

fn render_error() -> Element {
    Element::new("div")
        .with_class("error-state")
        .with_child(Element::new("p").with_text(ERROR_MESSAGE))
        .with_child(
            Element::new("button")
                .with_class("retry-button")
                .with_attr("type", "button")
                .with_text(RETRY_LABEL),
        )
}
