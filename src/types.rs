//! Content types shared by every manager.
//!
//! These mirror the JSON documents under `data/` one-to-one. Field names are
//! camelCase on the wire; the envelope structs (`EventsDocument`, …) exist so
//! each resource deserializes straight from its file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Completed,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Icon class list, e.g. `"fas fa-robot"`.
    pub icon: String,
    #[serde(default)]
    pub featured: bool,
    /// Sort key, ascending.
    pub priority: i64,
    pub status: EventStatus,
    /// Calendar date as written in the document (`YYYY-MM-DD`).
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsDocument {
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workshop {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkshopsDocument {
    pub workshops: Vec<Workshop>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialLinks>,
}

/// A yearly cohort of club members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub year: String,
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub text: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    #[serde(default)]
    pub batches: Vec<Batch>,
    #[serde(default)]
    pub quotes: Vec<Quote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembersDocument {
    pub team_members: TeamRoster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Text shown in place of the image when it cannot be displayed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl GalleryItem {
    pub fn placeholder_text(&self) -> &str {
        self.placeholder.as_deref().unwrap_or(&self.title)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryDocument {
    pub gallery: Vec<GalleryItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedBanner {
    pub id: String,
    /// Sort key, ascending.
    pub order: i64,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    /// CSS gradient layered over the image.
    #[serde(default)]
    pub gradient: String,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub button_link: String,
    #[serde(default)]
    pub is_placeholder: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedDocument {
    pub featured_banners: Vec<FeaturedBanner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Workshop,
    Event,
    Announcement,
    Info,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Workshop => "workshop",
            NotificationKind::Event => "event",
            NotificationKind::Announcement => "announcement",
            NotificationKind::Info => "info",
        }
    }

    /// Icon used when a notification is created without one.
    pub fn default_icon(self) -> &'static str {
        match self {
            NotificationKind::Workshop => "fas fa-tools",
            NotificationKind::Event => "fas fa-calendar-alt",
            NotificationKind::Announcement => "fas fa-bullhorn",
            NotificationKind::Info => "fas fa-info-circle",
        }
    }

    /// Label for the trailing link of a notification of this kind.
    pub fn link_label(self) -> &'static str {
        match self {
            NotificationKind::Workshop => "Learn more",
            NotificationKind::Event => "View event",
            NotificationKind::Announcement | NotificationKind::Info => "Read more",
        }
    }
}

/// A notification type name outside the four known kinds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown notification type: {0}")]
pub struct UnknownNotificationKind(pub String);

impl std::str::FromStr for NotificationKind {
    type Err = UnknownNotificationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workshop" => Ok(NotificationKind::Workshop),
            "event" => Ok(NotificationKind::Event),
            "announcement" => Ok(NotificationKind::Announcement),
            "info" => Ok(NotificationKind::Info),
            other => Err(UnknownNotificationKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationLink {
    pub href: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub icon: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<NotificationLink>,
}

/// Notification list as stored in `data/notifications.json` and in the
/// persisted snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsDocument {
    pub notifications: Vec<Notification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutDescription {
    pub paragraph1: String,
    #[serde(default)]
    pub paragraph2: String,
    #[serde(default)]
    pub paragraph3: String,
}

impl AboutDescription {
    /// Non-empty paragraphs in order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        [&self.paragraph1, &self.paragraph2, &self.paragraph3]
            .into_iter()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub icon: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutImage {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub overlay_title: String,
    #[serde(default)]
    pub overlay_description: String,
}

/// Content of `data/about.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub section_title: String,
    #[serde(default)]
    pub section_subtitle: String,
    pub description: AboutDescription,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<AboutImage>,
}
