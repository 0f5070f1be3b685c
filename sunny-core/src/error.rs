use thiserror::Error;

use crate::{api::ApiError, carousel::WidgetError, dom::DomError};

/// Failures of page components.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no element matches '{selector}'; the page must render it before mounting")]
    MissingAnchor { selector: String },
    #[error(transparent)]
    Selector(#[from] DomError),
    #[error(transparent)]
    Widget(#[from] WidgetError),
    #[error(transparent)]
    Fetch(#[from] ApiError),
}

pub type SyncResult<T> = Result<T, SyncError>;
