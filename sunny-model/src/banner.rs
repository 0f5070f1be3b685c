use crate::ids::OpaqueId;

/// One promotional image as served by `GET /api/banners`.
///
/// Read-only on the client. A banner without `image_url` still deserializes
/// (to an empty string) and yields a slide with an empty `src`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Banner {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<OpaqueId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image_url: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub alt_text: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub link_url: Option<String>,
}

impl Banner {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<OpaqueId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt_text = Some(alt.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link_url = Some(link.into());
        self
    }

    /// Alt text to render, falling back to `fallback` when the server sent
    /// none or an empty string.
    pub fn alt_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.alt_text.as_deref() {
            Some(alt) if !alt.is_empty() => alt,
            _ => fallback,
        }
    }

    /// Hyperlink target, if the banner should be clickable.
    pub fn link(&self) -> Option<&str> {
        self.link_url.as_deref().filter(|link| !link.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_alt_falls_back() {
        let banner = Banner::new("a.png").with_alt("");
        assert_eq!(banner.alt_or("fallback"), "fallback");
        assert_eq!(Banner::new("a.png").alt_or("fallback"), "fallback");
        assert_eq!(
            Banner::new("a.png").with_alt("Summer").alt_or("fallback"),
            "Summer"
        );
    }

    #[test]
    fn empty_link_is_not_a_link() {
        assert_eq!(Banner::new("a.png").with_link("").link(), None);
        assert_eq!(
            Banner::new("a.png").with_link("https://x.com").link(),
            Some("https://x.com")
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn decodes_sparse_records() {
        let banners: Vec<Banner> = serde_json::from_str(
            r#"[
                {"id": 1, "image_url": "a.png", "link_url": "https://x.com"},
                {"id": "b", "image_url": "b.png", "alt_text": null},
                {"alt_text": "no image"}
            ]"#,
        )
        .unwrap();

        assert_eq!(banners.len(), 3);
        assert_eq!(banners[0].link(), Some("https://x.com"));
        assert_eq!(banners[1].id, Some(OpaqueId::from("b")));
        assert_eq!(banners[1].alt_text, None);
        assert_eq!(banners[2].image_url, "");
    }
}
