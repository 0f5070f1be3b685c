use std::fmt;

/// Page scope used in `GET /api/banners?page=<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PageId(pub String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        PageId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Everything that differs between two banner pages.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageConfig {
    /// Selector of the carousel root, e.g. `#advertisement-banner-carousel`.
    pub container_selector: String,
    pub page_id: PageId,
    /// Caption used when a banner carries no `alt_text`.
    pub fallback_alt_text: String,
}

impl PageConfig {
    pub const ADVERTISEMENT: &'static str = "advertisement";
    pub const WAREHOUSE: &'static str = "warehouse";

    pub fn new(
        container_selector: impl Into<String>,
        page_id: impl Into<String>,
        fallback_alt_text: impl Into<String>,
    ) -> Self {
        Self {
            container_selector: container_selector.into(),
            page_id: PageId::new(page_id),
            fallback_alt_text: fallback_alt_text.into(),
        }
    }

    pub fn advertisement() -> Self {
        Self::new(
            "#advertisement-banner-carousel",
            Self::ADVERTISEMENT,
            "SunnyYummy 廣告",
        )
    }

    pub fn warehouse() -> Self {
        Self::new(
            "#warehouse-banner-carousel",
            Self::WAREHOUSE,
            "SunnyYummy 倉庫",
        )
    }

    /// Built-in page for `page_id`, if there is one.
    pub fn preset(page_id: &str) -> Option<Self> {
        match page_id {
            Self::ADVERTISEMENT => Some(Self::advertisement()),
            Self::WAREHOUSE => Some(Self::warehouse()),
            _ => None,
        }
    }

    pub fn presets() -> Vec<Self> {
        vec![Self::advertisement(), Self::warehouse()]
    }

    /// Element id of the carousel root, without the leading `#`.
    pub fn anchor_id(&self) -> &str {
        self.container_selector
            .trim()
            .trim_start_matches('#')
    }
}
