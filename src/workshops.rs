//! Workshops grid on the home page.
//!
//! Only featured workshops are shown. Each card carries `data-workshop-id`
//! so the detail modal can look the workshop up with [`WorkshopsManager::get_by_id`].

use crate::dom::{Container, stagger_delay};
use crate::source::{self, ResourceSource, fetch_json};
use crate::types::{Workshop, WorkshopsDocument};
use maud::{Markup, html};
use tracing::warn;

const STAGGER_MS: u64 = 1;

pub fn featured_workshops(workshops: &[Workshop]) -> Vec<&Workshop> {
    workshops.iter().filter(|w| w.featured).collect()
}

#[derive(Debug, Clone, Default)]
pub struct WorkshopsManager {
    workshops: Option<Vec<Workshop>>,
}

impl WorkshopsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, source: &dyn ResourceSource) -> Option<&[Workshop]> {
        match fetch_json::<WorkshopsDocument>(source, source::WORKSHOPS) {
            Ok(doc) => self.workshops = Some(doc.workshops),
            Err(e) => {
                warn!(error = %e, "failed to load workshops");
                self.workshops = None;
            }
        }
        self.workshops.as_deref()
    }

    pub fn workshops(&self) -> Option<&[Workshop]> {
        self.workshops.as_deref()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Workshop> {
        self.workshops()?.iter().find(|w| w.id == id)
    }

    pub fn render(&self, container: &mut Container) {
        let Some(workshops) = self.workshops() else { return };
        container.clear();
        for (i, workshop) in featured_workshops(workshops).into_iter().enumerate() {
            container.append(workshop_card(workshop, i));
        }
    }
}

fn workshop_card(workshop: &Workshop, index: usize) -> Markup {
    html! {
        div.workshop-card.glass-container
            data-aos="zoom-in"
            data-aos-delay=(stagger_delay(index, STAGGER_MS))
            data-workshop-id=(workshop.id)
        {
            div.workshop-icon {
                i class=(workshop.icon) {}
            }
            h3 { (workshop.title) }
            p { (workshop.description) }
            button.workshop-btn type="button" data-workshop-id=(workshop.id) { "Learn More" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Slot;
    use crate::source::MemorySource;
    use crate::test_helpers::workshops_json;

    fn loaded() -> WorkshopsManager {
        let source = MemorySource::new().with(source::WORKSHOPS, workshops_json());
        let mut manager = WorkshopsManager::new();
        manager.load(&source);
        manager
    }

    #[test]
    fn renders_only_featured_workshops() {
        let manager = loaded();
        let mut container = Container::new(Slot::WorkshopsGrid).loading();
        manager.render(&mut container);

        assert_eq!(container.children().len(), 2);
        let out = container.render().into_string();
        assert!(out.contains(r#"data-workshop-id="arduino""#));
        assert!(!out.contains(r#"data-workshop-id="drafts""#));
    }

    #[test]
    fn repeated_render_does_not_duplicate() {
        let manager = loaded();
        let mut container = Container::new(Slot::WorkshopsGrid);
        manager.render(&mut container);
        let first = container.render().into_string();
        manager.render(&mut container);
        assert_eq!(container.render().into_string(), first);
    }

    #[test]
    fn lookup_by_id() {
        let manager = loaded();
        assert_eq!(manager.get_by_id("arduino").unwrap().title, "Arduino Basics");
        assert!(manager.get_by_id("missing").is_none());
        assert!(WorkshopsManager::new().get_by_id("arduino").is_none());
    }

    #[test]
    fn failed_load_renders_nothing() {
        let mut manager = WorkshopsManager::new();
        assert!(manager.load(&MemorySource::new()).is_none());
        let mut container = Container::new(Slot::WorkshopsGrid).loading();
        manager.render(&mut container);
        assert!(container.children().is_empty());
    }
}
