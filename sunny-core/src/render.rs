//! Banner → slide mapping.

use sunny_model::Banner;

use crate::dom::Element;

/// Marker class the carousel widget indexes slides by.
pub const SLIDE_CLASS: &str = "swiper-slide";
/// Class of the element holding the slides.
pub const WRAPPER_CLASS: &str = "swiper-wrapper";

/// Renders banners for one page.
#[derive(Debug, Clone)]
pub struct SlideRenderer {
    fallback_alt_text: String,
}

impl SlideRenderer {
    pub fn new(fallback_alt_text: impl Into<String>) -> Self {
        Self {
            fallback_alt_text: fallback_alt_text.into(),
        }
    }

    pub fn fallback_alt_text(&self) -> &str {
        &self.fallback_alt_text
    }

    /// `div.swiper-slide` holding the banner image, wrapped in a link when
    /// the banner has a non-empty `link_url`. URLs are passed through
    /// unvalidated.
    pub fn render(&self, banner: &Banner) -> Element {
        let image = Element::new("img")
            .with_attr("src", banner.image_url.as_str())
            .with_attr("alt", banner.alt_or(&self.fallback_alt_text));

        let mut slide = Element::new("div").with_class(SLIDE_CLASS);
        if let Some(id) = &banner.id {
            slide.set_attr("data-banner-id", id.to_string());
        }

        match banner.link() {
            Some(href) => {
                slide.with_child(Element::new("a").with_attr("href", href).with_child(image))
            }
            None => slide.with_child(image),
        }
    }

    pub fn render_all(&self, banners: &[Banner]) -> Vec<Element> {
        banners.iter().map(|banner| self.render(banner)).collect()
    }
}
