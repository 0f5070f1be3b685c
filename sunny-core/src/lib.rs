//! Client-side content layer of the SunnyYummy site.
//!
//! Banner pages share one component, [`sync::BannerCarousel`]: it mounts on a
//! page that already carries a carousel skeleton, fetches the page's banners
//! once, renders them into slides and rebuilds the carousel widget. The game
//! directory ([`games::GameDirectory`]) lists playable games and reports
//! plays. Both talk to the server through the [`api`] traits so tests and
//! alternative transports can stand in for [`api::ApiClient`].
#![allow(missing_docs)]

pub mod api;
pub mod carousel;
pub mod dom;
pub mod error;
pub mod games;
pub mod render;
pub mod sync;

pub use api::{ApiClient, ApiError, ApiResult, BannerSource, GameSource};
pub use carousel::{Carousel, CarouselConfig, CarouselWidget, WidgetError, WidgetPhase};
pub use dom::{Document, Element, Selector};
pub use error::{SyncError, SyncResult};
pub use games::{DirectoryState, GameDirectory};
pub use render::SlideRenderer;
pub use sync::{BannerCarousel, SyncOutcome};
