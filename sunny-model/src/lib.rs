//! Core data model definitions shared across SunnyYummy crates.
#![allow(missing_docs)]

pub mod banner;
pub mod game;
pub mod ids;
pub mod page;

pub use banner::Banner;
pub use game::Game;
pub use ids::OpaqueId;
pub use page::{PageConfig, PageId};
