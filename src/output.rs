//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **content-centric, not file-centric**. Each page is shown by its
//! title first with its output file as secondary context, and each resource
//! by what it holds (counts, featured subsets) rather than by the JSON file
//! it came from.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//!     Loaded: events, workshops, teams, gallery, featured, about, notifications
//!     Rendered: 7 sections
//! Events → events.html
//!     Loaded: events, workshops, teams, gallery, featured, about, notifications
//!     Failed: workshops
//!     Rendered: 2 sections
//!
//! Assets
//!     12 files copied
//!
//! Generated 5 pages (theme: dark)
//! ```
//!
//! ## Check
//!
//! ```text
//! Events (8, 5 featured)
//! Workshops (3, 2 featured)
//! Teams (3 batches, 4 members, 2 quotes)
//! Gallery (5 items)
//!     Missing: assets/gallery/hackathon.jpg
//! Featured (3 banners, looping)
//! About: Who We Are
//! Notifications (3, 2 unread)
//! ```
//!
//! ## Notifications
//!
//! ```text
//! 001 * IoT Workshop (workshop)
//!     Id: workshop-iot
//!     3 days ago
//! 002   Monthly Meetup (announcement)
//!     Id: meetup
//!     2 months ago
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::content::{ContentManager, InitReport, Resource};
use crate::dom::Slot;
use crate::generate::BuildSummary;
use crate::notifications::{NotificationManager, format_timestamp};
use crate::types::Notification;
use chrono::{DateTime, SecondsFormat, Utc};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn resource_list(resources: &[Resource]) -> String {
    resources
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn slot_list(slots: &[Slot]) -> String {
    slots
        .iter()
        .map(|s| s.class_name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Context lines for one page initialization.
fn report_lines(report: &InitReport, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    let mut lines = vec![format!("{pad}Loaded: {}", resource_list(&report.loaded))];
    if !report.failed.is_empty() {
        lines.push(format!("{pad}Failed: {}", resource_list(&report.failed)));
    }
    if report.degraded {
        lines.push(format!("{pad}Core content missing, page shows error state"));
    }
    lines.push(format!(
        "{pad}Rendered: {}",
        plural(report.rendered.len(), "section", "sections")
    ));
    if !report.errors.is_empty() {
        lines.push(format!("{pad}Errors: {}", slot_list(&report.errors)));
    }
    if report.has_new_notifications {
        lines.push(format!(
            "{pad}New notifications: {} unread",
            report.unread_notifications
        ));
    }
    lines
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = Vec::new();
    for page in &summary.pages {
        let file = page
            .path
            .strip_prefix(&summary.output_dir)
            .unwrap_or(&page.path);
        lines.push(format!("{} → {}", page.kind.title(), file.display()));
        if let Some(report) = &page.report {
            lines.extend(report_lines(report, 1));
        }
    }

    lines.push(String::new());
    lines.push("Assets".to_string());
    lines.push(format!(
        "{}{} copied",
        indent(1),
        plural(summary.assets_copied, "file", "files")
    ));

    lines.push(String::new());
    lines.push(format!(
        "Generated {} (theme: {})",
        plural(summary.pages.len(), "page", "pages"),
        summary.theme
    ));
    lines
}

pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Content inventory after a full load. `missing_images` are gallery
/// references the probe rejected.
pub fn format_check_output(
    manager: &ContentManager,
    report: &InitReport,
    missing_images: &[String],
) -> Vec<String> {
    let mut lines = Vec::new();
    let failed = |r: Resource| report.failed.contains(&r);

    match manager.events().events() {
        Some(events) => {
            let featured = events.iter().filter(|e| e.featured).count();
            lines.push(format!("Events ({}, {} featured)", events.len(), featured));
        }
        None => lines.push("Events: failed to load".to_string()),
    }

    match manager.workshops().workshops() {
        Some(workshops) => {
            let featured = workshops.iter().filter(|w| w.featured).count();
            lines.push(format!(
                "Workshops ({}, {} featured)",
                workshops.len(),
                featured
            ));
        }
        None => lines.push("Workshops: failed to load".to_string()),
    }

    match manager.teams().roster() {
        Some(roster) => {
            let members: usize = roster.batches.iter().map(|b| b.members.len()).sum();
            lines.push(format!(
                "Teams ({}, {}, {})",
                plural(roster.batches.len(), "batch", "batches"),
                plural(members, "member", "members"),
                plural(roster.quotes.len(), "quote", "quotes")
            ));
        }
        None => lines.push("Teams: failed to load".to_string()),
    }

    match manager.gallery().items() {
        Some(items) => {
            lines.push(format!(
                "Gallery ({})",
                plural(items.len(), "item", "items")
            ));
            for missing in missing_images {
                lines.push(format!("{}Missing: {}", indent(1), missing));
            }
        }
        None => lines.push("Gallery: failed to load".to_string()),
    }

    let featured = manager.featured();
    if failed(Resource::Featured) {
        lines.push(format!(
            "Featured: failed to load ({} fallback)",
            featured.mode().as_str()
        ));
    } else {
        lines.push(format!(
            "Featured ({}, {})",
            plural(featured.banners().len(), "banner", "banners"),
            featured.mode().as_str()
        ));
    }

    match manager.about().about() {
        Some(about) => lines.push(format!("About: {}", about.section_title)),
        None => lines.push("About: failed to load (built-in text)".to_string()),
    }

    let notifications = manager.notifications();
    match notifications.notifications() {
        Some(list) => lines.push(format!(
            "Notifications ({}, {} unread)",
            list.len(),
            notifications.unread_count()
        )),
        None => lines.push("Notifications: failed to load".to_string()),
    }

    lines
}

pub fn print_check_output(
    manager: &ContentManager,
    report: &InitReport,
    missing_images: &[String],
) {
    for line in format_check_output(manager, report, missing_images) {
        println!("{}", line);
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Newest-first list; unread entries are starred.
pub fn format_notification_list(list: &[&Notification], now: DateTime<Utc>) -> Vec<String> {
    if list.is_empty() {
        return vec!["No notifications".to_string()];
    }
    let mut lines = Vec::new();
    for (i, n) in list.iter().enumerate() {
        let marker = if n.is_read { " " } else { "*" };
        lines.push(format!(
            "{} {} {} ({})",
            format_index(i + 1),
            marker,
            n.title,
            n.kind.as_str()
        ));
        lines.push(format!("{}Id: {}", indent(1), n.id));
        if !n.message.is_empty() {
            lines.push(format!("{}{}", indent(1), n.message));
        }
        if let Some(link) = &n.link {
            lines.push(format!("{}{}: {}", indent(1), link.label, link.href));
        }
        lines.push(format!("{}{}", indent(1), format_timestamp(n.timestamp, now)));
    }
    lines
}

pub fn print_notification_list(list: &[&Notification], now: DateTime<Utc>) {
    for line in format_notification_list(list, now) {
        println!("{}", line);
    }
}

pub fn format_notification_status(manager: &NotificationManager) -> Vec<String> {
    let total = manager.notifications().map_or(0, <[Notification]>::len);
    vec![
        format!(
            "{}, {} unread",
            plural(total, "notification", "notifications"),
            manager.unread_count()
        ),
        format!(
            "Last checked: {}",
            manager
                .last_checked()
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        if manager.has_new_notifications() {
            "New since last check: yes".to_string()
        } else {
            "New since last check: no".to_string()
        },
    ]
}

pub fn print_notification_status(manager: &NotificationManager) {
    for line in format_notification_status(manager) {
        println!("{}", line);
    }
}
