//! Notifications: the list, read state, and the "new since last visit" badge.
//!
//! The list is seeded from `data/notifications.json`; once anything has been
//! changed locally, the persisted snapshot in the [`LocalStore`] takes over.
//! New notifications are prepended, so the stored list is newest-first as
//! long as only [`NotificationManager::add_notification`] inserts. Rendering
//! re-sorts by timestamp anyway.
//!
//! The badge is driven by a single checkpoint, `lastNotificationCheck`: a
//! notification counts as new when it is unread and newer than the
//! checkpoint. Only [`NotificationManager::mark_as_checked`] moves it.

use crate::dom::{Container, stagger_delay};
use crate::source::{self, ResourceSource, fetch_json};
use crate::store::{LAST_CHECK_KEY, LocalStore, NOTIFICATIONS_KEY, StoreError};
use crate::types::{Notification, NotificationKind, NotificationLink, NotificationsDocument};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use maud::{Markup, html};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

const STAGGER_MS: u64 = 1;

/// Checkpoint used when none has been stored yet.
pub fn default_last_checked() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Wall-clock source.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Receives the "there is something new" signal.
pub trait NotificationSignal: Send + Sync {
    fn show_new(&self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoSignal;

impl NotificationSignal for NoSignal {
    fn show_new(&self) {}
}

/// Latching badge: lit by [`NotificationSignal::show_new`], cleared explicitly.
#[derive(Debug, Default)]
pub struct BadgeIndicator {
    lit: AtomicBool,
}

impl BadgeIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_lit(&self) -> bool {
        self.lit.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.lit.store(false, Ordering::Release);
    }
}

impl NotificationSignal for BadgeIndicator {
    fn show_new(&self) {
        self.lit.store(true, Ordering::Release);
    }
}

/// `N minutes ago` under an hour, `N hours ago` under a day, else `N days ago`.
pub fn format_timestamp(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - timestamp).max(chrono::TimeDelta::zero());
    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        format!("{minutes} minutes ago")
    } else if elapsed.num_hours() < 24 {
        format!("{} hours ago", elapsed.num_hours())
    } else {
        format!("{} days ago", elapsed.num_days())
    }
}

/// `notification-<unix millis>`, bumped past `last_issued` and any id in use.
fn next_id(now_millis: i64, last_issued: Option<i64>, taken: &[Notification]) -> (String, i64) {
    let mut millis = match last_issued {
        Some(last) if now_millis <= last => last + 1,
        _ => now_millis,
    };
    loop {
        let id = format!("notification-{millis}");
        if !taken.iter().any(|n| n.id == id) {
            return (id, millis);
        }
        millis += 1;
    }
}

pub struct NotificationManager {
    data: Option<NotificationsDocument>,
    last_checked: DateTime<Utc>,
    last_issued: Option<i64>,
    store: Arc<dyn LocalStore>,
    clock: Arc<dyn Clock>,
    signal: Arc<dyn NotificationSignal>,
}

impl std::fmt::Debug for NotificationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationManager")
            .field("data", &self.data)
            .field("last_checked", &self.last_checked)
            .finish_non_exhaustive()
    }
}

impl NotificationManager {
    /// Reads the stored checkpoint. An unreadable checkpoint falls back to
    /// the default.
    pub fn new(
        store: Arc<dyn LocalStore>,
        clock: Arc<dyn Clock>,
        signal: Arc<dyn NotificationSignal>,
    ) -> Self {
        let last_checked = match store.get(LAST_CHECK_KEY) {
            Ok(Some(raw)) => DateTime::parse_from_rfc3339(&raw)
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_else(|e| {
                    warn!(value = %raw, error = %e, "ignoring unparseable notification checkpoint");
                    default_last_checked()
                }),
            Ok(None) => default_last_checked(),
            Err(e) => {
                warn!(error = %e, "failed to read notification checkpoint");
                default_last_checked()
            }
        };
        Self {
            data: None,
            last_checked,
            last_issued: None,
            store,
            clock,
            signal,
        }
    }

    /// Seed from `data/notifications.json`, then let the persisted snapshot
    /// override it.
    pub fn load(&mut self, source: &dyn ResourceSource) -> Option<&[Notification]> {
        match fetch_json::<NotificationsDocument>(source, source::NOTIFICATIONS) {
            Ok(doc) => self.data = Some(doc),
            Err(e) => warn!(error = %e, "failed to load notifications"),
        }
        if let Some(snapshot) = self.load_snapshot() {
            self.data = Some(snapshot);
        }
        self.notifications()
    }

    fn load_snapshot(&self) -> Option<NotificationsDocument> {
        let raw = match self.store.get(NOTIFICATIONS_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "failed to read notification snapshot");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(error = %e, "ignoring corrupt notification snapshot"))
            .ok()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(data) = &self.data else {
            return Ok(());
        };
        let json = serde_json::to_string(data).map_err(|source| StoreError::Encode {
            key: NOTIFICATIONS_KEY.to_string(),
            source,
        })?;
        self.store.set(NOTIFICATIONS_KEY, &json)
    }

    /// Stored order (newest-first while only `add_notification` inserts).
    pub fn notifications(&self) -> Option<&[Notification]> {
        self.data.as_ref().map(|d| d.notifications.as_slice())
    }

    pub fn last_checked(&self) -> DateTime<Utc> {
        self.last_checked
    }

    pub fn has_new_notifications(&self) -> bool {
        self.notifications().is_some_and(|list| {
            list.iter()
                .any(|n| n.timestamp > self.last_checked && !n.is_read)
        })
    }

    /// Move the checkpoint to now. This is what clears the badge.
    pub fn mark_as_checked(&mut self) -> Result<(), StoreError> {
        self.last_checked = self.clock.now();
        self.store.set(
            LAST_CHECK_KEY,
            &self.last_checked.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
    }

    pub fn unread_count(&self) -> usize {
        self.notifications()
            .map_or(0, |list| list.iter().filter(|n| !n.is_read).count())
    }

    /// Newest first by timestamp.
    pub fn sorted_notifications(&self) -> Vec<&Notification> {
        let mut list: Vec<&Notification> =
            self.notifications().unwrap_or_default().iter().collect();
        list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        list
    }

    /// Prepend a new unread notification, persist, and fire the signal.
    pub fn add_notification(
        &mut self,
        title: &str,
        message: &str,
        kind: NotificationKind,
        icon: Option<&str>,
        link: Option<NotificationLink>,
    ) -> Result<Notification, StoreError> {
        let now = self.clock.now();
        let data = self.data.get_or_insert_with(NotificationsDocument::default);
        let (id, millis) = next_id(now.timestamp_millis(), self.last_issued, &data.notifications);
        self.last_issued = Some(millis);

        let notification = Notification {
            id,
            title: title.to_string(),
            message: message.to_string(),
            icon: icon.unwrap_or(kind.default_icon()).to_string(),
            timestamp: now,
            is_read: false,
            kind,
            link,
        };
        data.notifications.insert(0, notification.clone());
        data.last_updated = Some(now);

        self.persist()?;
        self.signal.show_new();
        info!(id = %notification.id, title, "notification added");
        Ok(notification)
    }

    fn add_with_link(
        &mut self,
        kind: NotificationKind,
        title: &str,
        message: &str,
        link: Option<&str>,
    ) -> Result<Notification, StoreError> {
        let link = link.map(|href| NotificationLink {
            href: href.to_string(),
            label: kind.link_label().to_string(),
        });
        self.add_notification(title, message, kind, None, link)
    }

    pub fn add_workshop_notification(
        &mut self,
        title: &str,
        message: &str,
        link: Option<&str>,
    ) -> Result<Notification, StoreError> {
        self.add_with_link(NotificationKind::Workshop, title, message, link)
    }

    pub fn add_event_notification(
        &mut self,
        title: &str,
        message: &str,
        link: Option<&str>,
    ) -> Result<Notification, StoreError> {
        self.add_with_link(NotificationKind::Event, title, message, link)
    }

    pub fn add_announcement_notification(
        &mut self,
        title: &str,
        message: &str,
        link: Option<&str>,
    ) -> Result<Notification, StoreError> {
        self.add_with_link(NotificationKind::Announcement, title, message, link)
    }

    /// Returns false when no notification has `id`.
    pub fn mark_as_read(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(data) = &mut self.data else {
            return Ok(false);
        };
        let Some(notification) = data.notifications.iter_mut().find(|n| n.id == id) else {
            return Ok(false);
        };
        notification.is_read = true;
        self.persist()?;
        Ok(true)
    }

    /// Returns how many were unread.
    pub fn mark_all_as_read(&mut self) -> Result<usize, StoreError> {
        let Some(data) = &mut self.data else {
            return Ok(0);
        };
        let mut changed = 0;
        for n in data.notifications.iter_mut().filter(|n| !n.is_read) {
            n.is_read = true;
            changed += 1;
        }
        self.persist()?;
        Ok(changed)
    }

    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        let Some(data) = &mut self.data else {
            return Ok(());
        };
        data.notifications.clear();
        self.persist()
    }

    /// Notifications page list, newest first.
    pub fn render(&self, container: &mut Container) {
        if self.data.is_none() {
            return;
        }
        container.clear();
        let list = self.sorted_notifications();
        if list.is_empty() {
            container.append(empty_state());
            return;
        }
        let now = self.clock.now();
        for (i, notification) in list.into_iter().enumerate() {
            container.append(notification_item(notification, i, now));
        }
    }
}

fn empty_state() -> Markup {
    html! {
        div.notifications-empty data-aos="fade-up" {
            i.fas.fa-bell-slash {}
            h3 { "No notifications" }
            p { "You're all caught up! Check back later for updates." }
        }
    }
}

fn notification_item(n: &Notification, index: usize, now: DateTime<Utc>) -> Markup {
    html! {
        div.notification-item.unread[!n.is_read]
            data-aos="fade-up"
            data-aos-delay=(stagger_delay(index, STAGGER_MS))
            data-notification-id=(n.id)
            data-type=(n.kind.as_str())
        {
            div.notification-icon {
                i class=(n.icon) {}
            }
            div.notification-content {
                h3 { (n.title) }
                p {
                    (n.message)
                    @if let Some(link) = &n.link {
                        " "
                        a.notification-link href=(link.href) { (link.label) }
                    }
                }
                span.notification-time
                    title=(n.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
                {
                    (format_timestamp(n.timestamp, now))
                }
            }
        }
    }
}
