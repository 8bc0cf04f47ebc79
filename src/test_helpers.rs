//! Shared test utilities for the club-site test suite.
//!
//! Provides the JSON documents the managers load, small builders for
//! individual records, and test doubles for the clock and the image probe.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = MemorySource::new().with(source::EVENTS, eight_events_json());
//! let mut manager = EventsManager::default();
//! manager.load(&source);
//!
//! let out = container.render().into_string();
//! assert!(opening_tag(&out, r#"data-index="0""#).contains("active"));
//! ```

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

use crate::gallery::ImageProbe;
use crate::notifications::Clock;
use crate::source::{self, MemorySource};
use crate::types::{Event, EventStatus};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Every resource a page load fetches, served from memory.
pub fn sample_source() -> MemorySource {
    MemorySource::new()
        .with(source::EVENTS, eight_events_json())
        .with(source::WORKSHOPS, workshops_json())
        .with(source::MEMBERS, members_json())
        .with(source::GALLERY, gallery_json())
        .with(source::FEATURED, featured_json())
        .with(source::ABOUT, about_json())
        .with(source::NOTIFICATIONS, notifications_json())
}

// =========================================================================
// Records
// =========================================================================

pub fn event(id: &str, priority: i64, featured: bool) -> Event {
    Event {
        id: id.to_string(),
        title: format!("Event {id}"),
        description: format!("About {id}"),
        icon: "fas fa-star".to_string(),
        featured,
        priority,
        status: EventStatus::Upcoming,
        date: "2025-03-14".to_string(),
    }
}

pub fn notification(id: &str, timestamp: &str, is_read: bool) -> Value {
    json!({
        "id": id,
        "title": format!("Notification {id}"),
        "message": "Details inside",
        "icon": "fas fa-bell",
        "timestamp": timestamp,
        "isRead": is_read,
        "type": "announcement"
    })
}

pub fn utc(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text).unwrap().with_timezone(&Utc)
}

// =========================================================================
// Documents
// =========================================================================

/// Eight events, five featured with priorities 3, 1, 4, 1, 5 in document
/// order.
pub fn eight_events_json() -> String {
    let entry = |id: &str, priority: i64, featured: bool, status: &str, date: &str| {
        json!({
            "id": id,
            "title": format!("Event {id}"),
            "description": format!("About {id}"),
            "icon": "fas fa-calendar",
            "featured": featured,
            "priority": priority,
            "status": status,
            "date": date
        })
    };
    json!({
        "events": [
            entry("f1", 3, true, "completed", "2024-11-02"),
            entry("n1", 2, false, "completed", "2024-10-12"),
            entry("f2", 1, true, "upcoming", "2025-08-20"),
            entry("f3", 4, true, "completed", "2024-12-15"),
            entry("n2", 6, false, "upcoming", "2025-09-01"),
            entry("f4", 1, true, "upcoming", "2025-10-05"),
            entry("n3", 7, false, "completed", "2024-08-30"),
            entry("f5", 5, true, "upcoming", "2025-11-11")
        ]
    })
    .to_string()
}

pub fn workshops_json() -> String {
    json!({
        "workshops": [
            {
                "id": "arduino",
                "title": "Arduino Basics",
                "description": "Blink your first LED.",
                "icon": "fas fa-microchip",
                "featured": true
            },
            {
                "id": "drafts",
                "title": "Upcoming Ideas",
                "description": "Not announced yet.",
                "icon": "fas fa-lightbulb",
                "featured": false
            },
            {
                "id": "web",
                "title": "Web Development",
                "description": "HTML, CSS and a little JavaScript.",
                "icon": "fas fa-code",
                "featured": true
            }
        ]
    })
    .to_string()
}

pub fn members_json() -> String {
    json!({
        "teamMembers": {
            "batches": [
                {
                    "year": "2023",
                    "name": "Batch 2023",
                    "icon": "fas fa-users",
                    "members": [
                        {
                            "name": "Asha Kumari",
                            "social": { "github": "https://github.com/asha" }
                        },
                        {
                            "name": "Ravi Verma",
                            "photo": "assets/team/ravi.jpg",
                            "social": {
                                "linkedin": "https://linkedin.com/in/ravi",
                                "email": "ravi@example.com"
                            }
                        }
                    ]
                },
                {
                    "year": "2022",
                    "name": "Batch 2022",
                    "icon": "fas fa-user-graduate",
                    "members": [{ "name": "Neha Singh" }]
                },
                {
                    "year": "2021",
                    "name": "Batch 2021",
                    "icon": "fas fa-award",
                    "members": []
                }
            ],
            "quotes": [
                { "text": "Build first, polish later.", "author": "Club Lead" },
                { "text": "Every bug is a lesson.", "author": "Alumnus", "image": "assets/team/alumnus.jpg" }
            ]
        }
    })
    .to_string()
}

pub fn gallery_json() -> String {
    json!({
        "gallery": [
            {
                "image": "assets/gallery/robotics.jpg",
                "title": "Robotics Expo",
                "description": "Line followers on parade."
            },
            {
                "image": "assets/gallery/hackathon.jpg",
                "title": "Hackathon",
                "description": "24 hours of code.",
                "placeholder": "Hackathon photos coming soon"
            },
            {
                "image": "assets/gallery/workshop.jpg",
                "title": "Workshop Day",
                "description": "Soldering practice."
            },
            {
                "image": "assets/gallery/techfest.jpg",
                "title": "Tech Fest",
                "description": "Annual festival."
            },
            {
                "title": "Farewell",
                "description": "Seeing off the seniors."
            }
        ]
    })
    .to_string()
}

/// Three banners whose `order` sorts them hackathon, robotics, orientation.
pub fn featured_json() -> String {
    json!({
        "featuredBanners": [
            {
                "id": "robotics",
                "order": 2,
                "title": "Robotics Championship",
                "subtitle": "Build • Compete • Win",
                "description": "Inter-college robot race.",
                "image": "assets/banners/robotics.jpg",
                "gradient": "linear-gradient(135deg, #f093fb 0%, #f5576c 100%)",
                "buttonText": "Register",
                "buttonLink": "events.html"
            },
            {
                "id": "orientation",
                "order": 3,
                "title": "Freshers Orientation",
                "image": "assets/banners/orientation.jpg",
                "buttonText": "Join",
                "buttonLink": "#about"
            },
            {
                "id": "hackathon",
                "order": 1,
                "title": "Hack the Campus",
                "subtitle": "24 hours",
                "image": "assets/banners/hackathon.jpg",
                "buttonText": "Sign up",
                "buttonLink": "events.html"
            }
        ]
    })
    .to_string()
}

pub fn single_featured_json() -> String {
    json!({
        "featuredBanners": [
            {
                "id": "solo",
                "order": 1,
                "title": "Only Banner",
                "image": "assets/banners/solo.jpg"
            }
        ]
    })
    .to_string()
}

pub fn about_json() -> String {
    json!({
        "sectionTitle": "Who We Are",
        "sectionSubtitle": "Students who build things",
        "description": {
            "paragraph1": "We are the technical club of the college.",
            "paragraph2": "We run workshops, hackathons and competitions.",
            "paragraph3": ""
        },
        "highlights": [
            { "icon": "fas fa-microchip", "text": "Hardware labs" },
            { "icon": "fas fa-code", "text": "Coding nights" }
        ],
        "image": {
            "src": "assets/images/about.jpg",
            "alt": "Club members",
            "overlayTitle": "Innovation Hub",
            "overlayDescription": "Where ideas come to life"
        }
    })
    .to_string()
}

/// Three notifications dated March to June 2025, two unread.
pub fn notifications_json() -> String {
    json!({
        "notifications": [
            {
                "id": "workshop-iot",
                "title": "IoT Workshop",
                "message": "Registrations are open.",
                "icon": "fas fa-tools",
                "timestamp": "2025-06-10T09:00:00Z",
                "isRead": false,
                "type": "workshop",
                "link": { "href": "workshops.html", "label": "Learn more" }
            },
            {
                "id": "meetup",
                "title": "Monthly Meetup",
                "message": "See you in the lab.",
                "icon": "fas fa-bullhorn",
                "timestamp": "2025-05-02T15:30:00Z",
                "isRead": true,
                "type": "announcement"
            },
            {
                "id": "welcome",
                "title": "Welcome",
                "message": "The new site is live.",
                "icon": "fas fa-info-circle",
                "timestamp": "2025-03-01T08:00:00Z",
                "isRead": false,
                "type": "info"
            }
        ],
        "lastUpdated": "2025-06-10T09:00:00Z"
    })
    .to_string()
}

// =========================================================================
// Test doubles
// =========================================================================

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(text: &str) -> Self {
        Self {
            now: Mutex::new(utc(text)),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Image probe that reports the listed references as missing.
#[derive(Debug, Default)]
pub struct MissingImages {
    missing: HashSet<String>,
}

impl MissingImages {
    pub fn new<'a>(refs: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            missing: refs.into_iter().map(str::to_string).collect(),
        }
    }
}

impl ImageProbe for MissingImages {
    fn exists(&self, reference: &str) -> bool {
        !self.missing.contains(reference)
    }
}

// =========================================================================
// Markup assertions
// =========================================================================

/// The opening tag enclosing the first occurrence of `needle`.
///
/// Lets tests check for a class without depending on attribute order.
pub fn opening_tag<'a>(html: &'a str, needle: &str) -> &'a str {
    let at = html
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in {html}"));
    let start = html[..=at].rfind('<').unwrap();
    let end = at + html[at..].find('>').unwrap();
    &html[start..=end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_tag_spans_enclosing_element() {
        let html = r#"<ul><li class="dot active" data-index="1">x</li></ul>"#;
        assert_eq!(
            opening_tag(html, r#"data-index="1""#),
            r#"<li class="dot active" data-index="1">"#
        );
        assert_eq!(opening_tag(html, ">x<"), r#"<li class="dot active" data-index="1">"#);
    }
}
