//! Banner carousel controller: fetch, render, rebuild the widget.
//!
//! One [`BannerCarousel`] serves any page; everything page specific comes
//! from its [`PageConfig`]. A sync either leaves the page exactly as it was
//! (empty result, failure) or replaces the slides and runs the widget through
//! destroy and reconstruct, in that order, inside a single `async fn`.

use sunny_model::{Banner, PageConfig};
use tracing::{error, info, warn};

use crate::{
    api::BannerSource,
    carousel::{Carousel, CarouselConfig, CarouselWidget, WidgetPhase},
    dom::{Document, Selector},
    error::{SyncError, SyncResult},
    render::{SlideRenderer, WRAPPER_CLASS},
};

/// Result of one sync attempt. Never escapes as an error: failures are
/// logged and reported here for callers that care.
#[derive(Debug)]
pub enum SyncOutcome {
    /// Slides were replaced and the widget rebuilt.
    Replaced { slides: usize },
    /// The server had no banners for this page; nothing changed.
    Empty,
    /// Fetching or rebuilding failed; the carousel keeps its last state.
    Failed(SyncError),
}

impl SyncOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, SyncOutcome::Replaced { .. })
    }
}

#[derive(Debug)]
pub struct BannerCarousel<S, W = Carousel> {
    page: PageConfig,
    config: CarouselConfig,
    renderer: SlideRenderer,
    anchor: Selector,
    wrapper: Selector,
    document: Document,
    source: S,
    widget: W,
    phase: WidgetPhase,
    generation: u32,
}

impl<S, W> BannerCarousel<S, W>
where
    S: BannerSource,
    W: CarouselWidget,
{
    /// Page-ready step: resolves the anchor and constructs the initial
    /// widget over whatever slides the page already carries.
    pub fn mount(document: Document, page: PageConfig, source: S) -> SyncResult<Self> {
        Self::mount_with(document, page, CarouselConfig::default(), source)
    }

    pub fn mount_with(
        document: Document,
        page: PageConfig,
        config: CarouselConfig,
        source: S,
    ) -> SyncResult<Self> {
        let anchor = Selector::parse(&page.container_selector)?;
        let wrapper = anchor.descendant(&Selector::parse(&format!(".{WRAPPER_CLASS}"))?);

        let root = document.find(&anchor).ok_or_else(|| SyncError::MissingAnchor {
            selector: anchor.to_string(),
        })?;
        if document.find(&wrapper).is_none() {
            return Err(SyncError::MissingAnchor {
                selector: wrapper.to_string(),
            });
        }
        let widget = W::construct(&config, root)?;

        info!(
            page = %page.page_id,
            anchor = %anchor,
            slides = widget.slide_count(),
            "banner carousel mounted"
        );

        Ok(Self {
            renderer: SlideRenderer::new(page.fallback_alt_text.clone()),
            page,
            config,
            anchor,
            wrapper,
            document,
            source,
            widget,
            phase: WidgetPhase::Constructed,
            generation: 1,
        })
    }

    /// Mounts and runs the one startup sync.
    pub async fn start(
        document: Document,
        page: PageConfig,
        source: S,
    ) -> SyncResult<(Self, SyncOutcome)> {
        let mut carousel = Self::mount(document, page, source)?;
        let outcome = carousel.sync().await;
        Ok((carousel, outcome))
    }

    pub async fn sync(&mut self) -> SyncOutcome {
        let page_id = self.page.page_id.clone();

        let banners = match self.source.fetch_banners(&page_id).await {
            Ok(banners) => banners,
            Err(err) => {
                warn!(
                    page = %page_id,
                    error = %err,
                    "banner fetch failed; keeping current slides"
                );
                return SyncOutcome::Failed(err.into());
            }
        };

        if banners.is_empty() {
            info!(page = %page_id, "no banners for page; keeping default slides");
            return SyncOutcome::Empty;
        }

        match self.replace_slides(&banners) {
            Ok(slides) => {
                info!(
                    page = %page_id,
                    slides,
                    generation = self.generation,
                    "banner slides replaced"
                );
                SyncOutcome::Replaced { slides }
            }
            Err(err) => {
                error!(page = %page_id, error = %err, "failed to rebuild carousel");
                SyncOutcome::Failed(err)
            }
        }
    }

    // populate -> destroy -> construct
    fn replace_slides(&mut self, banners: &[Banner]) -> SyncResult<usize> {
        let slides = self.renderer.render_all(banners);
        let count = slides.len();

        let wrapper = self
            .document
            .find_mut(&self.wrapper)
            .ok_or_else(|| SyncError::MissingAnchor {
                selector: self.wrapper.to_string(),
            })?;
        wrapper.clear_children();
        for slide in slides {
            wrapper.push_child(slide);
        }

        self.widget.destroy();
        self.phase = WidgetPhase::Destroyed;

        let root = self
            .document
            .find(&self.anchor)
            .ok_or_else(|| SyncError::MissingAnchor {
                selector: self.anchor.to_string(),
            })?;
        self.widget = W::construct(&self.config, root)?;
        self.phase = WidgetPhase::Reconstructed;
        self.generation += 1;

        Ok(count)
    }

    pub fn page(&self) -> &PageConfig {
        &self.page
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn phase(&self) -> WidgetPhase {
        self.phase
    }

    /// Number of widget instances constructed so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Serialized carousel root.
    pub fn carousel_html(&self) -> String {
        self.document
            .find(&self.anchor)
            .map(|root| root.to_html())
            .unwrap_or_default()
    }
}
