//! About section on the home page.
//!
//! Unlike the other sections, a failed load is not an error state: the
//! built-in description is shown instead.

use crate::dom::Container;
use crate::source::{self, ResourceSource, fetch_json};
use crate::types::About;
use maud::{Markup, html};
use tracing::warn;

const FALLBACK_TITLE: &str = "About ASIMO Technical Club";

#[derive(Debug, Clone, Default)]
pub struct AboutManager {
    about: Option<About>,
}

impl AboutManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, source: &dyn ResourceSource) -> Option<&About> {
        match fetch_json::<About>(source, source::ABOUT) {
            Ok(about) => self.about = Some(about),
            Err(e) => {
                warn!(error = %e, "failed to load about section");
                self.about = None;
            }
        }
        self.about.as_ref()
    }

    pub fn about(&self) -> Option<&About> {
        self.about.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.about.is_some()
    }

    pub fn render(&self, container: &mut Container) {
        container.clear();
        container.append(match &self.about {
            Some(about) => about_markup(about),
            None => fallback_markup(),
        });
    }
}

fn about_markup(about: &About) -> Markup {
    html! {
        div.about-text {
            h2.section-title #about-title { (about.section_title) }
            @if !about.section_subtitle.is_empty() {
                p.section-subtitle #about-subtitle { (about.section_subtitle) }
            }
            div.about-description #about-description {
                @for paragraph in about.description.paragraphs() {
                    p { (paragraph) }
                }
            }
            @if !about.highlights.is_empty() {
                div.about-highlights #about-highlights {
                    @for highlight in &about.highlights {
                        div.highlight-item {
                            i class=(highlight.icon) {}
                            span { (highlight.text) }
                        }
                    }
                }
            }
        }
        @if let Some(image) = &about.image {
            div.about-image {
                img #about-image src=(image.src) alt=(image.alt) loading="lazy";
                div.image-overlay {
                    h3 #about-overlay-title { (image.overlay_title) }
                    p #about-overlay-description { (image.overlay_description) }
                }
            }
        }
    }
}

fn fallback_markup() -> Markup {
    html! {
        div.about-text {
            h2.section-title #about-title { (FALLBACK_TITLE) }
            div.about-description #about-description {
                p {
                    strong { "ASIMO Technical Club" }
                    " is the flagship technical organization at "
                    strong { "Government Engineering College Samastipur (GEC Samastipur)" }
                    ". We foster technological advancement and engineering innovation."
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Slot;
    use crate::source::MemorySource;
    use crate::test_helpers::about_json;

    #[test]
    fn renders_loaded_content() {
        let source = MemorySource::new().with(source::ABOUT, about_json());
        let mut manager = AboutManager::new();
        assert!(manager.load(&source).is_some());

        let mut container = Container::new(Slot::About).loading();
        manager.render(&mut container);
        let out = container.render().into_string();
        assert!(out.contains("Who We Are"));
        assert!(out.contains("fas fa-microchip"));
        assert!(out.contains("assets/images/about.jpg"));
        // Empty third paragraph is skipped.
        assert_eq!(out.matches("<p>").count(), 2);
    }

    #[test]
    fn failed_load_renders_fallback() {
        let mut manager = AboutManager::new();
        assert!(manager.load(&MemorySource::new()).is_none());

        let mut container = Container::new(Slot::About).loading();
        manager.render(&mut container);
        let out = container.render().into_string();
        assert!(out.contains(FALLBACK_TITLE));
        assert!(!out.contains("content-loading"));
    }
}
