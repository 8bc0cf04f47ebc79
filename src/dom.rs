//! Render targets.
//!
//! A [`PageDocument`] is the server-side stand-in for the page DOM: a list of
//! named [`Container`]s that managers render into. Containers keep two kinds
//! of children apart: static decoration that belongs to the page template
//! (the timeline rule, section headers) and dynamic fragments appended by a
//! manager. Clearing a container only ever drops the dynamic side, which is
//! what makes repeated renders produce the same markup.

use crate::routing::PageKind;
use maud::{Markup, PreEscaped, html};
use std::collections::BTreeMap;

/// Message shown in loading placeholders when content could not be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading content. Please refresh the page.";

/// Named render targets. Each page template has a subset of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// Home page featured-banner strip.
    FeaturedBanners,
    /// Indicator dots under the featured strip.
    BannerIndicators,
    About,
    /// Home page event timeline (featured events only).
    EventsTimeline,
    WorkshopsGrid,
    BatchGrid,
    QuotesStack,
    /// Home page gallery preview.
    GalleryGrid,
    /// Events page list of every event.
    AllEvents,
    /// Events page grid with status and date.
    EventsExtended,
    /// Gallery page, every item.
    GalleryExtended,
    TeamSections,
    Notifications,
}

impl Slot {
    /// CSS class of the container element.
    pub fn class_name(self) -> &'static str {
        match self {
            Slot::FeaturedBanners => "featured-banners-container",
            Slot::BannerIndicators => "banner-indicators",
            Slot::About => "about-content",
            Slot::EventsTimeline => "events-timeline",
            Slot::WorkshopsGrid => "workshops-grid",
            Slot::BatchGrid => "batch-grid",
            Slot::QuotesStack => "quotes-stack",
            Slot::GalleryGrid => "gallery-grid",
            Slot::AllEvents => "all-events-container",
            Slot::EventsExtended => "events-extended-grid",
            Slot::GalleryExtended => "gallery-extended",
            Slot::TeamSections => "team-sections",
            Slot::Notifications => "notifications-container",
        }
    }
}

/// Entrance-animation delay for the item at `index`.
pub fn stagger_delay(index: usize, step_ms: u64) -> u64 {
    index as u64 * step_ms
}

/// HTML-escape text for use inside a quoted attribute.
fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

fn loading_placeholder() -> Markup {
    html! {
        div.content-loading {
            div.loading-spinner {}
            p { "Loading..." }
        }
    }
}

fn error_placeholder() -> Markup {
    html! {
        div.content-error {
            i.fas.fa-exclamation-triangle {}
            p { (LOAD_ERROR_MESSAGE) }
        }
    }
}

/// Whether a container is still showing its loading placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No placeholder: either never had one or content replaced it.
    Settled,
    Loading,
    Failed,
}

#[derive(Debug, Clone)]
pub struct Container {
    slot: Slot,
    attrs: BTreeMap<String, String>,
    static_children: Vec<Markup>,
    children: Vec<Markup>,
    state: LoadState,
}

impl Container {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            attrs: BTreeMap::new(),
            static_children: Vec::new(),
            children: Vec::new(),
            state: LoadState::Settled,
        }
    }

    /// Start out showing a loading placeholder.
    pub fn loading(mut self) -> Self {
        self.state = LoadState::Loading;
        self
    }

    /// Add template decoration that survives `clear()`.
    pub fn with_static(mut self, child: Markup) -> Self {
        self.static_children.push(child);
        self
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn children(&self) -> &[Markup] {
        &self.children
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.insert(name.to_string(), value.into());
    }

    /// Drop dynamic children and the loading placeholder.
    pub fn clear(&mut self) {
        self.children.clear();
        self.state = LoadState::Settled;
    }

    pub fn append(&mut self, child: Markup) {
        if self.state == LoadState::Loading {
            self.state = LoadState::Settled;
        }
        self.children.push(child);
    }

    /// Replace a pending loading placeholder with the error message.
    ///
    /// Returns false when the container was not loading.
    pub fn show_error(&mut self) -> bool {
        if self.state != LoadState::Loading {
            return false;
        }
        self.state = LoadState::Failed;
        true
    }

    pub fn render(&self) -> Markup {
        let attrs: String = self
            .attrs
            .iter()
            .map(|(k, v)| format!(r#" {}="{}""#, k, escape(v)))
            .collect();
        html! {
            (PreEscaped(format!(r#"<div class="{}"{}>"#, self.slot.class_name(), attrs)))
            @for child in &self.static_children {
                (child)
            }
            @match self.state {
                LoadState::Loading => (loading_placeholder()),
                LoadState::Failed => (error_placeholder()),
                LoadState::Settled => {
                    @for child in &self.children {
                        (child)
                    }
                }
            }
            (PreEscaped("</div>"))
        }
    }
}

/// The set of render targets one page offers.
#[derive(Debug, Clone)]
pub struct PageDocument {
    kind: PageKind,
    containers: Vec<Container>,
    body_attrs: BTreeMap<String, String>,
}

impl PageDocument {
    pub fn new(kind: PageKind, containers: Vec<Container>) -> Self {
        Self {
            kind,
            containers,
            body_attrs: BTreeMap::new(),
        }
    }

    /// The stock layout of each page.
    pub fn for_page(kind: PageKind) -> Self {
        let containers = match kind {
            PageKind::Home => vec![
                Container::new(Slot::FeaturedBanners).loading(),
                Container::new(Slot::BannerIndicators),
                Container::new(Slot::About).loading(),
                Container::new(Slot::EventsTimeline)
                    .loading()
                    .with_static(html! { div.timeline-line {} }),
                Container::new(Slot::WorkshopsGrid).loading(),
                Container::new(Slot::BatchGrid).loading(),
                Container::new(Slot::QuotesStack).loading(),
                Container::new(Slot::GalleryGrid).loading(),
            ],
            PageKind::Events => vec![
                Container::new(Slot::AllEvents)
                    .loading()
                    .with_static(html! { div.timeline-line {} }),
                Container::new(Slot::EventsExtended).loading(),
            ],
            PageKind::Gallery => vec![Container::new(Slot::GalleryExtended).loading()],
            PageKind::Teams => vec![Container::new(Slot::TeamSections).loading()],
            PageKind::Notifications => vec![Container::new(Slot::Notifications).loading()],
        };
        Self::new(kind, containers)
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn container(&self, slot: Slot) -> Option<&Container> {
        self.containers.iter().find(|c| c.slot == slot)
    }

    /// `None` means the page has no such target; callers skip rendering.
    pub fn container_mut(&mut self, slot: Slot) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.slot == slot)
    }

    /// Mutable access to two distinct containers at once.
    pub fn container_pair_mut(
        &mut self,
        a: Slot,
        b: Slot,
    ) -> (Option<&mut Container>, Option<&mut Container>) {
        let mut first = None;
        let mut second = None;
        for c in self.containers.iter_mut() {
            if c.slot == a && first.is_none() {
                first = Some(c);
            } else if c.slot == b && second.is_none() {
                second = Some(c);
            }
        }
        (first, second)
    }

    /// Put the error message into every container still loading.
    pub fn show_error_everywhere(&mut self) -> usize {
        self.containers
            .iter_mut()
            .filter_map(|c| c.show_error().then_some(()))
            .count()
    }

    pub fn body_attr(&self, name: &str) -> Option<&str> {
        self.body_attrs.get(name).map(String::as_str)
    }

    pub fn set_body_attr(&mut self, name: &str, value: impl Into<String>) {
        self.body_attrs.insert(name.to_string(), value.into());
    }

    pub fn body_attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.body_attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Markup of every container in layout order.
    pub fn render(&self) -> Markup {
        html! {
            @for container in &self.containers {
                (container.render())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_keeps_static_children() {
        let mut c =
            Container::new(Slot::EventsTimeline).with_static(html! { div.timeline-line {} });
        c.append(html! { div.event-item { "a" } });
        c.clear();
        c.append(html! { div.event-item { "b" } });

        let out = c.render().into_string();
        assert!(out.contains("timeline-line"));
        assert!(out.contains(">b<"));
        assert!(!out.contains(">a<"));
    }

    #[test]
    fn loading_placeholder_shown_until_content() {
        let mut c = Container::new(Slot::WorkshopsGrid).loading();
        assert!(c.render().into_string().contains("content-loading"));

        c.append(html! { p { "ready" } });
        let out = c.render().into_string();
        assert!(!out.contains("content-loading"));
        assert!(out.contains("ready"));
    }

    #[test]
    fn show_error_only_replaces_loading_placeholder() {
        let mut loading = Container::new(Slot::GalleryGrid).loading();
        assert!(loading.show_error());
        let out = loading.render().into_string();
        assert!(out.contains(LOAD_ERROR_MESSAGE));
        assert!(!out.contains("content-loading"));

        let mut settled = Container::new(Slot::GalleryGrid);
        settled.append(html! { p { "kept" } });
        assert!(!settled.show_error());
        assert!(settled.render().into_string().contains("kept"));
    }

    #[test]
    fn attrs_are_escaped() {
        let mut c = Container::new(Slot::FeaturedBanners);
        c.set_attr("style", r#"a"b"#);
        let out = c.render().into_string();
        assert!(out.contains(r#"style="a&quot;b""#));
        assert!(out.starts_with(r#"<div class="featured-banners-container""#));
    }

    #[test]
    fn missing_slot_is_none() {
        let mut doc = PageDocument::for_page(PageKind::Gallery);
        assert!(doc.container_mut(Slot::EventsTimeline).is_none());
        assert!(doc.container_mut(Slot::GalleryExtended).is_some());
    }

    #[test]
    fn container_pair_returns_both() {
        let mut doc = PageDocument::for_page(PageKind::Home);
        let (a, b) = doc.container_pair_mut(Slot::FeaturedBanners, Slot::BannerIndicators);
        assert!(a.is_some());
        assert!(b.is_some());
    }

    #[test]
    fn show_error_everywhere_counts_loading_containers() {
        let mut doc = PageDocument::for_page(PageKind::Home);
        // Indicators start without a placeholder.
        assert_eq!(doc.show_error_everywhere(), 7);
        assert_eq!(doc.show_error_everywhere(), 0);
    }

    #[test]
    fn stagger_is_linear() {
        assert_eq!(stagger_delay(0, 100), 0);
        assert_eq!(stagger_delay(3, 100), 300);
        assert_eq!(stagger_delay(5, 20), 100);
    }
}
