//! Events: the home page timeline and the events page.
//!
//! Selection is pure (`featured_events`, `sorted_events`, `filter_events`)
//! and borrows from the loaded collection; the `render_*` methods paint the
//! selection into a container. Sorts are stable, so events with equal
//! priority keep their document order.

use crate::dom::{Container, stagger_delay};
use crate::source::{self, ResourceSource, fetch_json};
use crate::types::{Event, EventStatus, EventsDocument};
use chrono::{DateTime, NaiveDate};
use maud::{Markup, html};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_MAX_FEATURED: usize = 6;
const STAGGER_MS: u64 = 100;

/// Filter tabs on the events page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    #[default]
    All,
    Upcoming,
    Completed,
    Featured,
}

impl EventFilter {
    pub const ALL: [EventFilter; 4] = [
        EventFilter::All,
        EventFilter::Upcoming,
        EventFilter::Completed,
        EventFilter::Featured,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventFilter::All => "all",
            EventFilter::Upcoming => "upcoming",
            EventFilter::Completed => "completed",
            EventFilter::Featured => "featured",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EventFilter::All => "All Events",
            EventFilter::Upcoming => "Upcoming",
            EventFilter::Completed => "Completed",
            EventFilter::Featured => "Featured",
        }
    }

    fn matches(self, event: &Event) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Upcoming => event.status == EventStatus::Upcoming,
            EventFilter::Completed => event.status == EventStatus::Completed,
            EventFilter::Featured => event.featured,
        }
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventFilter {
    type Err = Infallible;

    /// Unknown filter names fall back to `All`, like an unrecognised tab.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EventFilter::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .unwrap_or_default())
    }
}

/// Featured events by ascending priority, at most `max`.
pub fn featured_events(events: &[Event], max: usize) -> Vec<&Event> {
    let mut featured: Vec<&Event> = events.iter().filter(|e| e.featured).collect();
    featured.sort_by_key(|e| e.priority);
    featured.truncate(max);
    featured
}

/// Every event by ascending priority.
pub fn sorted_events(events: &[Event]) -> Vec<&Event> {
    let mut all: Vec<&Event> = events.iter().collect();
    all.sort_by_key(|e| e.priority);
    all
}

/// Events matching `filter`, in document order.
pub fn filter_events(events: &[Event], filter: EventFilter) -> Vec<&Event> {
    events.iter().filter(|e| filter.matches(e)).collect()
}

/// `2025-01-05` → `January 5, 2025`. Unparseable dates are returned as-is.
pub fn format_long_date(date: &str) -> String {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|d| d.date_naive()));
    match parsed {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => date.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct EventsManager {
    events: Option<Vec<Event>>,
    max_featured: usize,
}

impl Default for EventsManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURED)
    }
}

impl EventsManager {
    pub fn new(max_featured: usize) -> Self {
        Self {
            events: None,
            max_featured,
        }
    }

    /// Fetch `data/events.json`. On failure the manager is left empty.
    pub fn load(&mut self, source: &dyn ResourceSource) -> Option<&[Event]> {
        match fetch_json::<EventsDocument>(source, source::EVENTS) {
            Ok(doc) => self.events = Some(doc.events),
            Err(e) => {
                warn!(error = %e, "failed to load events");
                self.events = None;
            }
        }
        self.events.as_deref()
    }

    pub fn events(&self) -> Option<&[Event]> {
        self.events.as_deref()
    }

    pub fn max_featured(&self) -> usize {
        self.max_featured
    }

    /// Home page timeline. The timeline rule is left in place.
    pub fn render_featured(&self, container: &mut Container) {
        let Some(events) = self.events() else { return };
        container.clear();
        for (i, event) in featured_events(events, self.max_featured)
            .into_iter()
            .enumerate()
        {
            container.append(timeline_item(event, i));
        }
    }

    /// Events page timeline with every event.
    pub fn render_all(&self, container: &mut Container) {
        let Some(events) = self.events() else { return };
        container.clear();
        for (i, event) in sorted_events(events).into_iter().enumerate() {
            container.append(timeline_item(event, i));
        }
    }

    /// Events page grid for one filter tab.
    pub fn render_filtered(&self, container: &mut Container, filter: EventFilter) {
        let Some(events) = self.events() else { return };
        container.clear();
        container.set_attr("data-filter", filter.as_str());
        for (i, event) in filter_events(events, filter).into_iter().enumerate() {
            container.append(event_card(event, i));
        }
    }
}

fn timeline_item(event: &Event, index: usize) -> Markup {
    html! {
        div.event-item data-aos="fade-up" data-aos-delay=(stagger_delay(index, STAGGER_MS)) {
            div.event-glass-card {
                div class={ "event-icon " (event.id) "-icon" } {
                    i class=(event.icon) {}
                }
                div.event-content {
                    h3.event-title { (event.title) }
                    p.event-description { (event.description) }
                }
                div.tubelight-effect {}
            }
        }
    }
}

fn event_card(event: &Event, index: usize) -> Markup {
    let status = event.status.as_str();
    html! {
        div.event-card
            data-aos="fade-up"
            data-aos-delay=(stagger_delay(index, STAGGER_MS))
            data-status=(status)
            data-featured=[event.featured.then_some("true")]
        {
            div class={ "event-status-corner " (status) } { (status) }
            div.event-icon {
                i class=(event.icon) {}
            }
            h3.event-title { (event.title) }
            p.event-description { (event.description) }
            div.event-meta {
                div.event-date {
                    i.fas.fa-calendar-alt {}
                    span { (format_long_date(&event.date)) }
                }
            }
        }
    }
}
