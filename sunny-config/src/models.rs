use std::time::Duration;

use serde::{Deserialize, Serialize};
use sunny_model::PageConfig;

use crate::error::ConfigLoadError;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fully resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api: ApiConfig,
    /// Banner pages, presets first. File entries replace a preset with the
    /// same `page_id`.
    pub pages: Vec<PageConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            pages: PageConfig::presets(),
        }
    }
}

impl ClientConfig {
    pub fn page(&self, page_id: &str) -> Option<&PageConfig> {
        self.pages
            .iter()
            .find(|page| page.page_id.as_str() == page_id)
    }

    pub(crate) fn merge_pages(&mut self, pages: Vec<PageConfig>) -> Result<(), ConfigLoadError> {
        for page in pages {
            validate_page(&page)?;
            match self
                .pages
                .iter_mut()
                .find(|existing| existing.page_id == page.page_id)
            {
                Some(existing) => *existing = page,
                None => self.pages.push(page),
            }
        }
        Ok(())
    }
}

fn validate_page(page: &PageConfig) -> Result<(), ConfigLoadError> {
    let invalid = |reason: &str| ConfigLoadError::InvalidPage {
        page_id: page.page_id.to_string(),
        reason: reason.to_string(),
    };
    if page.page_id.as_str().trim().is_empty() {
        return Err(invalid("page_id is empty"));
    }
    let is_single_id = page
        .container_selector
        .strip_prefix('#')
        .is_some_and(|id| !id.is_empty() && id.chars().all(is_id_char));
    if !is_single_id {
        return Err(invalid("container_selector must be a single #id selector"));
    }
    Ok(())
}

fn is_id_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Raw configuration as written in a config file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    pub api: FileApiConfig,
    pub pages: Vec<PageConfig>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Human readable duration such as `10s` or `1m 30s`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_both_presets() {
        let config = ClientConfig::default();
        assert!(config.page("advertisement").is_some());
        assert!(config.page("warehouse").is_some());
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn file_pages_replace_presets_by_id() {
        let mut config = ClientConfig::default();
        config
            .merge_pages(vec![
                PageConfig::new("#promo-carousel", "promo", "SunnyYummy 活動"),
                PageConfig::new("#ad-carousel", "advertisement", "Ads"),
            ])
            .unwrap();

        assert_eq!(config.pages.len(), 3);
        assert_eq!(config.page("advertisement").unwrap().container_selector, "#ad-carousel");
        assert_eq!(config.page("promo").unwrap().fallback_alt_text, "SunnyYummy 活動");
    }

    #[test]
    fn rejects_non_id_anchor() {
        let mut config = ClientConfig::default();
        let err = config
            .merge_pages(vec![PageConfig::new(".carousel", "promo", "x")])
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::InvalidPage { page_id, .. } if page_id == "promo"));
    }

    #[test]
    fn rejects_compound_and_descendant_anchors() {
        for selector in ["#promo .inner", "#a.b", "#", "# promo", "div#promo"] {
            let mut config = ClientConfig::default();
            let result = config.merge_pages(vec![PageConfig::new(selector, "promo", "x")]);
            assert!(
                matches!(result, Err(ConfigLoadError::InvalidPage { .. })),
                "accepted {selector:?}"
            );
        }

        let mut config = ClientConfig::default();
        config
            .merge_pages(vec![PageConfig::new("#promo_banner-2", "promo", "x")])
            .unwrap();
        assert_eq!(config.page("promo").unwrap().anchor_id(), "promo_banner-2");
    }
}
