//! Featured banners on the home page.
//!
//! One component covers both carousel modes. The strip is computed as a list
//! of [`Slide`]s from the banners and the carousel state, then painted.
//!
//! In looping mode a failed fetch falls back to a single placeholder banner
//! so the section never looks broken; simple mode shows an inline
//! "being loaded" notice instead.

use crate::carousel::{Carousel, CarouselMode, CarouselTiming};
use crate::dom::Container;
use crate::source::{self, ResourceSource, fetch_json};
use crate::types::{FeaturedBanner, FeaturedDocument};
use maud::{Markup, html};
use std::time::Duration;
use tracing::warn;

const PLACEHOLDER_COLORS: [&str; 5] = ["667eea", "f093fb", "4facfe", "a8edea", "ffecd2"];

/// Background color of the generated placeholder image at strip `index`.
pub fn placeholder_color(index: usize) -> &'static str {
    PLACEHOLDER_COLORS[index % PLACEHOLDER_COLORS.len()]
}

/// Shown when the banner document cannot be loaded in looping mode.
pub fn fallback_banners() -> Vec<FeaturedBanner> {
    vec![FeaturedBanner {
        id: "fallback-1".to_string(),
        order: 1,
        title: "Welcome to ASIMO Tech Club".to_string(),
        subtitle: "Innovation • Technology • Excellence".to_string(),
        description: "Discover amazing opportunities in technology and innovation.".to_string(),
        image: String::new(),
        gradient: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)".to_string(),
        button_text: "Explore".to_string(),
        button_link: "#about".to_string(),
        is_placeholder: true,
    }]
}

/// Image shown for a banner at strip position `index`.
pub fn banner_image_url(banner: &FeaturedBanner, index: usize) -> String {
    if banner.is_placeholder {
        format!(
            "https://via.placeholder.com/800x400/{}/ffffff?text={}",
            placeholder_color(index),
            urlencoding::encode(&banner.title)
        )
    } else {
        banner.image.clone()
    }
}

/// One element of the rendered strip.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide<'a> {
    pub banner: &'a FeaturedBanner,
    /// Position in the rendered strip.
    pub position: usize,
    pub is_clone: bool,
    pub image_url: String,
}

/// The strip for `banners`: looping mode wraps the real banners in a clone
/// of the last and a clone of the first when there are at least two.
pub fn strip_slides(banners: &[FeaturedBanner], mode: CarouselMode) -> Vec<Slide<'_>> {
    let looped = mode == CarouselMode::Looping && banners.len() > 1;
    let mut sequence: Vec<(&FeaturedBanner, bool)> = Vec::with_capacity(banners.len() + 2);
    sequence.extend(banners.last().filter(|_| looped).map(|b| (b, true)));
    sequence.extend(banners.iter().map(|b| (b, false)));
    sequence.extend(banners.first().filter(|_| looped).map(|b| (b, true)));
    sequence
        .into_iter()
        .enumerate()
        .map(|(position, (banner, is_clone))| Slide {
            banner,
            position,
            is_clone,
            image_url: banner_image_url(banner, position),
        })
        .collect()
}

/// `transform` style for a strip at `position`.
pub fn strip_transform(position: isize) -> String {
    format!("translateX({}%)", -(position.max(0) * 100))
}

#[derive(Debug, Clone)]
pub struct FeaturedManager {
    mode: CarouselMode,
    timing: CarouselTiming,
    banners: Vec<FeaturedBanner>,
}

impl FeaturedManager {
    pub fn new(mode: CarouselMode, timing: CarouselTiming) -> Self {
        Self {
            mode,
            timing,
            banners: Vec::new(),
        }
    }

    pub fn mode(&self) -> CarouselMode {
        self.mode
    }

    /// Fetch banners sorted by `order`.
    ///
    /// Returns `None` when the fetch failed; in looping mode the fallback
    /// banner is installed anyway.
    pub fn load(&mut self, source: &dyn ResourceSource) -> Option<&[FeaturedBanner]> {
        match fetch_json::<FeaturedDocument>(source, source::FEATURED) {
            Ok(doc) => {
                let mut banners = doc.featured_banners;
                banners.sort_by_key(|b| b.order);
                self.banners = banners;
                Some(&self.banners)
            }
            Err(e) => {
                warn!(error = %e, "failed to load featured banners");
                self.banners = match self.mode {
                    CarouselMode::Looping => fallback_banners(),
                    CarouselMode::Simple => Vec::new(),
                };
                None
            }
        }
    }

    pub fn banners(&self) -> &[FeaturedBanner] {
        &self.banners
    }

    /// A carousel sized to the loaded banners, started at `now`.
    pub fn carousel(&self, now: Duration) -> Carousel {
        Carousel::new(self.banners.len(), self.mode, self.timing, now)
    }

    /// Paint the strip and, if the page has them, the indicators.
    pub fn render(
        &self,
        strip: &mut Container,
        indicators: Option<&mut Container>,
        carousel: &Carousel,
    ) {
        strip.clear();
        let indicators = indicators.map(|c| {
            c.clear();
            c
        });

        if self.banners.is_empty() {
            strip.append(error_state());
            return;
        }

        strip.set_attr("data-mode", self.mode.as_str());
        strip.set_attr("data-count", self.banners.len().to_string());
        strip.set_attr("data-interval", self.timing.interval.as_millis().to_string());
        strip.set_attr("data-pause", self.timing.pause.as_millis().to_string());
        strip.set_attr("data-transition", self.timing.transition.as_millis().to_string());
        strip.set_attr("data-rotating", carousel.is_rotating().to_string());

        let slides = strip_slides(&self.banners, self.mode);
        match self.mode {
            CarouselMode::Looping => {
                strip.set_attr(
                    "style",
                    format!(
                        "transform: {}; transition: none;",
                        strip_transform(carousel.strip_position())
                    ),
                );
                for slide in &slides {
                    strip.append(banner_slide(slide));
                }
            }
            CarouselMode::Simple => {
                let active = carousel.active_index();
                for slide in &slides {
                    strip.append(banner_card(slide, slide.position == active));
                }
            }
        }

        let Some(indicators) = indicators else { return };
        if !carousel.has_indicators() {
            return;
        }
        let active = carousel.active_index();
        match self.mode {
            CarouselMode::Looping => {
                for i in 0..self.banners.len() {
                    indicators.append(html! {
                        div.banner-indicator.active[i == active] data-index=(i) {}
                    });
                }
            }
            CarouselMode::Simple => indicators.append(nav_controls(self.banners.len(), active)),
        }
    }
}

fn banner_slide(slide: &Slide) -> Markup {
    let banner = slide.banner;
    let background = format!(
        "background: {}, url('{}'); background-size: cover; \
         background-position: center; background-repeat: no-repeat;",
        banner.gradient, slide.image_url
    );
    html! {
        div.featured-banner
            data-index=(slide.position)
            data-clone=[slide.is_clone.then_some("true")]
            data-banner-id=(banner.id)
        {
            div.banner-background style=(background) {}
            div.banner-overlay {}
            div.banner-content {
                div.banner-text {
                    h3.banner-title { (banner.title) }
                    h4.banner-subtitle { (banner.subtitle) }
                    p.banner-description { (banner.description) }
                    a.banner-btn href=(banner.button_link) {
                        span { (banner.button_text) }
                        i.fas.fa-arrow-right {}
                    }
                }
            }
            div.banner-tubelight-effect {}
        }
    }
}

fn banner_card(slide: &Slide, active: bool) -> Markup {
    let banner = slide.banner;
    html! {
        div.featured-card.active[active] data-index=(slide.position) data-banner-id=(banner.id) {
            div.card-image style={ "background-image: url('" (slide.image_url) "');" } {
                div.card-gradient style={ "background: " (banner.gradient) } {}
            }
            div.card-content {
                h3.card-title { (banner.title) }
                h4.card-subtitle { (banner.subtitle) }
                p.card-description { (banner.description) }
                a.card-button href=(banner.button_link) {
                    (banner.button_text)
                    i.fas.fa-arrow-right {}
                }
            }
        }
    }
}

fn nav_controls(count: usize, active: usize) -> Markup {
    html! {
        div.banner-navigation {
            button.nav-btn.prev-btn type="button" data-action="prev" aria-label="Previous banner" {
                i.fas.fa-chevron-left {}
            }
            div.nav-dots {
                @for i in 0..count {
                    button.nav-dot.active[i == active] type="button" data-index=(i) {}
                }
            }
            button.nav-btn.next-btn type="button" data-action="next" aria-label="Next banner" {
                i.fas.fa-chevron-right {}
            }
        }
    }
}

fn error_state() -> Markup {
    html! {
        div.error-state {
            h3 { "Featured Content" }
            p { "Content is being loaded..." }
        }
    }
}
