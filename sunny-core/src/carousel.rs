//! Rotating-slide widget and its lifecycle.
//!
//! A widget indexes the slides present in its wrapper when it is constructed
//! and never re-reads the document afterwards. Picking up new slides means
//! destroying the instance and constructing a fresh one over the repopulated
//! container; [`WidgetPhase`] records where a page is in that cycle.

use std::time::Duration;

use thiserror::Error;

use crate::dom::{Element, Selector};
use crate::render::{SLIDE_CLASS, WRAPPER_CLASS};

/// Autoplay interval used by every banner page.
pub const AUTOPLAY_DELAY: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("carousel root has no .swiper-wrapper element")]
    MissingWrapper,
    #[error("carousel root has no element matching '{selector}'")]
    MissingControl { selector: String },
    #[error("carousel has been destroyed")]
    Destroyed,
    #[error("slide {index} out of range ({count} slides)")]
    OutOfRange { index: usize, count: usize },
    #[error("pagination is not clickable")]
    PaginationDisabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    pub el: String,
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationConfig {
    pub next_el: String,
    pub prev_el: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoplayConfig {
    pub delay: Duration,
    /// When `false`, manual navigation restarts the autoplay timer instead of
    /// stopping autoplay.
    pub disable_on_interaction: bool,
}

/// Construction options shared by the initial and every rebuilt instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselConfig {
    pub loop_slides: bool,
    pub pagination: Option<PaginationConfig>,
    pub navigation: Option<NavigationConfig>,
    pub autoplay: Option<AutoplayConfig>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            loop_slides: true,
            pagination: Some(PaginationConfig {
                el: ".swiper-pagination".to_string(),
                clickable: true,
            }),
            navigation: Some(NavigationConfig {
                next_el: ".swiper-button-next".to_string(),
                prev_el: ".swiper-button-prev".to_string(),
            }),
            autoplay: Some(AutoplayConfig {
                delay: AUTOPLAY_DELAY,
                disable_on_interaction: false,
            }),
        }
    }
}

impl CarouselConfig {
    /// Pagination and navigation elements the widget binds to.
    fn control_selectors(&self) -> impl Iterator<Item = &str> {
        let pagination = self.pagination.iter().map(|pagination| pagination.el.as_str());
        let navigation = self
            .navigation
            .iter()
            .flat_map(|nav| [nav.next_el.as_str(), nav.prev_el.as_str()]);
        pagination.chain(navigation)
    }
}

fn require_control(root: &Element, selector: &str) -> Result<(), WidgetError> {
    Selector::parse(selector)
        .ok()
        .and_then(|parsed| root.find(&parsed))
        .map(|_| ())
        .ok_or_else(|| WidgetError::MissingControl {
            selector: selector.to_string(),
        })
}

/// Where a page's widget is in the destroy/recreate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetPhase {
    Constructed,
    Destroyed,
    Reconstructed,
}

/// Seam between page controllers and the slide primitive.
pub trait CarouselWidget: Sized {
    /// Builds an instance over `root`, indexing the slides currently in its
    /// wrapper.
    fn construct(config: &CarouselConfig, root: &Element) -> Result<Self, WidgetError>;

    /// Releases the instance. Further navigation fails with
    /// [`WidgetError::Destroyed`].
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;

    /// Number of slides indexed at construction.
    fn slide_count(&self) -> usize;
}

/// What the widget remembers about one indexed slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideEntry {
    pub banner_id: Option<String>,
    pub image_src: Option<String>,
}

impl SlideEntry {
    fn index(slide: &Element) -> Self {
        let image = Selector::parse("img")
            .ok()
            .and_then(|selector| slide.find(&selector).and_then(|img| img.attr("src")));
        Self {
            banner_id: slide.attr("data-banner-id").map(str::to_string),
            image_src: image.map(str::to_string),
        }
    }
}

/// Headless swiper-style carousel.
#[derive(Debug, Clone)]
pub struct Carousel {
    config: CarouselConfig,
    slides: Vec<SlideEntry>,
    active: usize,
    since_transition: Duration,
    autoplay_running: bool,
    destroyed: bool,
}

impl CarouselWidget for Carousel {
    fn construct(config: &CarouselConfig, root: &Element) -> Result<Self, WidgetError> {
        let wrapper = Selector::parse(&format!(".{WRAPPER_CLASS}"))
            .ok()
            .and_then(|selector| root.find(&selector))
            .ok_or(WidgetError::MissingWrapper)?;
        for selector in config.control_selectors() {
            require_control(root, selector)?;
        }

        let slides = wrapper
            .child_elements()
            .filter(|child| child.has_class(SLIDE_CLASS))
            .map(SlideEntry::index)
            .collect();

        Ok(Self {
            config: config.clone(),
            slides,
            active: 0,
            since_transition: Duration::ZERO,
            autoplay_running: config.autoplay.is_some(),
            destroyed: false,
        })
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.autoplay_running = false;
        self.slides.clear();
        self.active = 0;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

impl Carousel {
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn slides(&self) -> &[SlideEntry] {
        &self.slides
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_slide(&self) -> Option<&SlideEntry> {
        self.slides.get(self.active)
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay_running
    }

    /// One bullet per slide when pagination is configured.
    pub fn pagination_bullets(&self) -> usize {
        if self.config.pagination.is_some() {
            self.slides.len()
        } else {
            0
        }
    }

    pub fn next(&mut self) -> Result<usize, WidgetError> {
        self.ensure_live()?;
        self.step_forward();
        self.interacted();
        Ok(self.active)
    }

    pub fn prev(&mut self) -> Result<usize, WidgetError> {
        self.ensure_live()?;
        let count = self.slides.len();
        if count > 0 {
            if self.active > 0 {
                self.active -= 1;
            } else if self.config.loop_slides {
                self.active = count - 1;
            }
        }
        self.interacted();
        Ok(self.active)
    }

    /// Pagination bullet click.
    pub fn go_to(&mut self, index: usize) -> Result<usize, WidgetError> {
        self.ensure_live()?;
        if !self
            .config
            .pagination
            .as_ref()
            .is_some_and(|pagination| pagination.clickable)
        {
            return Err(WidgetError::PaginationDisabled);
        }
        if index >= self.slides.len() {
            return Err(WidgetError::OutOfRange {
                index,
                count: self.slides.len(),
            });
        }
        self.active = index;
        self.interacted();
        Ok(self.active)
    }

    /// Feeds wall-clock time into autoplay. Returns how many slide
    /// transitions happened.
    pub fn advance(&mut self, elapsed: Duration) -> Result<usize, WidgetError> {
        self.ensure_live()?;
        let Some(delay) = self.config.autoplay.as_ref().map(|autoplay| autoplay.delay) else {
            return Ok(0);
        };
        if !self.autoplay_running || self.slides.len() < 2 || delay.is_zero() {
            return Ok(0);
        }

        let total = self.since_transition.saturating_add(elapsed).as_nanos();
        let delay_nanos = delay.as_nanos();
        let due = total / delay_nanos;
        let remainder = duration_from_nanos(total % delay_nanos);
        let count = self.slides.len();

        if self.config.loop_slides {
            let steps = (due % count as u128) as usize;
            self.active = (self.active + steps) % count;
            self.since_transition = remainder;
            return Ok(usize::try_from(due).unwrap_or(usize::MAX));
        }

        let room = count - 1 - self.active;
        if due <= room as u128 {
            let steps = due as usize;
            self.active += steps;
            self.since_transition = remainder;
            Ok(steps)
        } else {
            // Reached the last slide with a transition still pending.
            self.active = count - 1;
            self.autoplay_running = false;
            self.since_transition = Duration::ZERO;
            Ok(room)
        }
    }

    fn step_forward(&mut self) {
        let count = self.slides.len();
        if count == 0 {
            return;
        }
        if self.active + 1 < count {
            self.active += 1;
        } else if self.config.loop_slides {
            self.active = 0;
        }
    }

    fn interacted(&mut self) {
        self.since_transition = Duration::ZERO;
        if let Some(autoplay) = &self.config.autoplay
            && autoplay.disable_on_interaction
        {
            self.autoplay_running = false;
        }
    }

    fn ensure_live(&self) -> Result<(), WidgetError> {
        if self.destroyed {
            Err(WidgetError::Destroyed)
        } else {
            Ok(())
        }
    }
}

/// `nanos` is below some `Duration::as_nanos`, so it always fits.
fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    Duration::new(
        (nanos / NANOS_PER_SEC) as u64,
        (nanos % NANOS_PER_SEC) as u32,
    )
}
