//! HTML site generation.
//!
//! Runs one fresh [`ContentManager`] per page over that page's stock
//! [`PageDocument`], the same way a browser would on each page load, and
//! wraps the rendered containers in the shared page chrome.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): featured strip, about, event timeline,
//!   workshops, batches and quotes, gallery preview
//! - **Events** (`/events.html`): every event plus the filterable grid
//! - **Gallery** (`/gallery.html`): every gallery item
//! - **Teams** (`/teams.html`): one section per batch
//! - **Notifications** (`/notifications.html`): the notification list
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── events.html
//! ├── gallery.html
//! ├── teams.html
//! ├── notifications.html
//! └── assets/                    # Copied verbatim from the site
//!     └── ...
//! ```
//!
//! ## CSS
//!
//! `static/style.css` is embedded at compile time and inlined into every
//! page after the color variables generated from `config.toml`.
//!
//! ## JavaScript
//!
//! `static/site.js` is inlined at the end of every body. It drives the theme
//! toggle, the event filter tabs, the workshop details dialog, the featured
//! carousel (from the strip's `data-*` timing attributes) and the batch
//! navigation on the teams page.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config;
use crate::content::{AppContext, ContentManager, InitReport};
use crate::dom::{Container, PageDocument, Slot};
use crate::events::EventFilter;
use crate::routing::PageKind;
use crate::store::{StoreError, ThemePreference};
use chrono::Datelike;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to walk assets: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

/// One written page.
#[derive(Debug, Clone)]
pub struct PageSummary {
    pub kind: PageKind,
    pub path: PathBuf,
    pub report: Option<InitReport>,
}

/// Result of a full site build.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub output_dir: PathBuf,
    pub pages: Vec<PageSummary>,
    pub assets_copied: usize,
    pub theme: ThemePreference,
}

/// Everything around the containers that is the same on every page.
#[derive(Debug, Clone)]
pub struct Chrome<'a> {
    pub site_title: &'a str,
    pub css: &'a str,
    pub theme: ThemePreference,
    /// Badge count, shown only when the page flagged new notifications.
    pub unread: usize,
    pub year: i32,
}

pub fn generate(
    ctx: &AppContext,
    site_root: &Path,
    output_dir: &Path,
) -> Result<BuildSummary, GenerateError> {
    let color_css = config::generate_color_css(&ctx.config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);
    let theme = ThemePreference::load(ctx.store.as_ref())?;
    let year = ctx.clock.now().year();

    fs::create_dir_all(output_dir)?;

    let pages = PageKind::ALL
        .par_iter()
        .map(|&kind| -> Result<PageSummary, GenerateError> {
            let mut doc = PageDocument::for_page(kind);
            let mut manager = ContentManager::new(ctx.clone());
            let report = manager.init(&mut doc).report().cloned();

            let chrome = Chrome {
                site_title: &ctx.config.site.title,
                css: &css,
                theme,
                unread: report.as_ref().map_or(0, |r| r.unread_notifications),
                year,
            };
            let path = output_dir.join(kind.file_name());
            fs::write(&path, render_page(&doc, &chrome).into_string())?;
            info!(page = kind.file_name(), "generated page");
            Ok(PageSummary { kind, path, report })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let assets_copied = copy_assets(site_root, output_dir)?;
    info!(
        output = %output_dir.display(),
        pages = pages.len(),
        assets = assets_copied,
        "site generated"
    );

    Ok(BuildSummary {
        output_dir: output_dir.to_path_buf(),
        pages,
        assets_copied,
        theme,
    })
}

/// Copy `<site>/assets/` into the output. A site without assets copies
/// nothing.
fn copy_assets(site_root: &Path, output_dir: &Path) -> Result<usize, GenerateError> {
    let assets = site_root.join("assets");
    if !assets.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(&assets) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(site_root) else {
            continue;
        };
        let target = output_dir.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            debug!(asset = %relative.display(), "copied");
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// Page layout
// ============================================================================

/// A titled region of a page holding one or more containers.
struct Section {
    id: &'static str,
    heading: Option<&'static str>,
    slots: &'static [Slot],
    /// Trailing link to the full page.
    more: Option<(&'static str, &'static str)>,
}

const HOME_SECTIONS: &[Section] = &[
    Section {
        id: "home",
        heading: None,
        slots: &[Slot::FeaturedBanners, Slot::BannerIndicators],
        more: None,
    },
    // The about content carries its own heading.
    Section {
        id: "about",
        heading: None,
        slots: &[Slot::About],
        more: None,
    },
    Section {
        id: "events",
        heading: Some("Our Events"),
        slots: &[Slot::EventsTimeline],
        more: Some(("events.html", "View all events")),
    },
    Section {
        id: "workshops",
        heading: Some("Workshops"),
        slots: &[Slot::WorkshopsGrid],
        more: None,
    },
    Section {
        id: "teams",
        heading: Some("Our Team"),
        slots: &[Slot::BatchGrid, Slot::QuotesStack],
        more: None,
    },
    Section {
        id: "gallery",
        heading: Some("Gallery"),
        slots: &[Slot::GalleryGrid],
        more: Some(("gallery.html", "View full gallery")),
    },
];

const EVENTS_SECTIONS: &[Section] = &[
    Section {
        id: "all-events",
        heading: Some("All Events"),
        slots: &[Slot::AllEvents],
        more: None,
    },
    Section {
        id: "event-grid",
        heading: Some("Browse Events"),
        slots: &[Slot::EventsExtended],
        more: None,
    },
];

const GALLERY_SECTIONS: &[Section] = &[Section {
    id: "gallery",
    heading: Some("Gallery"),
    slots: &[Slot::GalleryExtended],
    more: None,
}];

const TEAMS_SECTIONS: &[Section] = &[Section {
    id: "teams",
    heading: Some("Our Team"),
    slots: &[Slot::TeamSections],
    more: None,
}];

const NOTIFICATION_SECTIONS: &[Section] = &[Section {
    id: "notifications",
    heading: Some("Notifications"),
    slots: &[Slot::Notifications],
    more: None,
}];

fn sections(kind: PageKind) -> &'static [Section] {
    match kind {
        PageKind::Home => HOME_SECTIONS,
        PageKind::Events => EVENTS_SECTIONS,
        PageKind::Gallery => GALLERY_SECTIONS,
        PageKind::Teams => TEAMS_SECTIONS,
        PageKind::Notifications => NOTIFICATION_SECTIONS,
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(doc: &PageDocument, chrome: &Chrome, content: Markup) -> Markup {
    let title = match doc.kind() {
        PageKind::Home => chrome.site_title.to_string(),
        kind => format!("{} | {}", kind.title(), chrome.site_title),
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (chrome.css) }
            }
            body class=[chrome.theme.body_class()]
                data-new-notifications=[doc.body_attr("data-new-notifications")]
                data-content-ready=[doc.body_attr("data-content-ready")]
            {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Renders the site header with page links and the theme toggle
fn site_header(current: PageKind, chrome: &Chrome, has_new: bool) -> Markup {
    html! {
        header.site-header {
            a.site-logo href="index.html" { (chrome.site_title) }
            nav.site-nav {
                ul {
                    @for kind in PageKind::ALL {
                        li class=[(kind == current).then_some("current")] {
                            a href=(kind.file_name()) {
                                (kind.title())
                                @if kind == PageKind::Notifications && has_new {
                                    span.notification-badge { (chrome.unread) }
                                }
                            }
                        }
                    }
                }
            }
            button.theme-toggle type="button" data-theme=(chrome.theme.as_str()) {
                i class=(chrome.theme.toggle_icon()) {}
                " "
                span.theme-toggle-text { (chrome.theme.toggle_label()) }
            }
        }
    }
}

/// Dialog filled from a workshop card when its "Learn More" button is used.
fn workshop_modal() -> Markup {
    html! {
        div.workshop-modal id="workshopModal" {
            div.workshop-modal-overlay data-action="close" {}
            div.workshop-modal-content role="dialog" aria-modal="true"
                aria-labelledby="workshopModalTitle"
            {
                button.workshop-modal-close type="button" data-action="close" aria-label="Close" {
                    i.fas.fa-times {}
                }
                div.workshop-modal-icon {
                    i id="workshopModalIcon" {}
                }
                h3 id="workshopModalTitle" {}
                p id="workshopModalDescription" {}
            }
        }
    }
}

/// Filter tabs above the events grid; the rendered filter is active.
fn event_filter_tabs(grid: &Container) -> Markup {
    let active: EventFilter = grid
        .attr("data-filter")
        .and_then(|f| f.parse().ok())
        .unwrap_or(EventFilter::All);
    html! {
        div.event-filters {
            @for filter in EventFilter::ALL {
                button.filter-btn.active[filter == active]
                    type="button"
                    data-filter=(filter.as_str())
                {
                    (filter.label())
                }
            }
        }
    }
}

fn render_section(doc: &PageDocument, section: &Section) -> Markup {
    html! {
        section id=(section.id) {
            @if let Some(heading) = section.heading {
                h2.section-title { (heading) }
            }
            @for slot in section.slots {
                @if let Some(container) = doc.container(*slot) {
                    @if *slot == Slot::EventsExtended {
                        (event_filter_tabs(container))
                    }
                    (container.render())
                }
            }
            @if let Some((href, label)) = section.more {
                a.view-more href=(href) { (label) }
            }
        }
    }
}

/// Renders one finished page.
pub fn render_page(doc: &PageDocument, chrome: &Chrome) -> Markup {
    let has_new = doc.body_attr("data-new-notifications").is_some();
    let present: Vec<&Section> = sections(doc.kind())
        .iter()
        .filter(|s| s.slots.iter().any(|slot| doc.container(*slot).is_some()))
        .collect();

    let content = html! {
        (site_header(doc.kind(), chrome, has_new))
        main class={ (doc.kind().title().to_lowercase()) "-page" } {
            @for section in &present {
                (render_section(doc, section))
            }
        }
        footer.site-footer {
            p { "© " (chrome.year) " " (chrome.site_title) }
        }
        @if doc.container(Slot::WorkshopsGrid).is_some() {
            (workshop_modal())
        }
    };

    base_document(doc, chrome, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use crate::store::{LocalStore, MemoryStore, THEME_KEY};
    use crate::test_helpers::{FixedClock, opening_tag, setup_fixtures};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn chrome(theme: ThemePreference) -> Chrome<'static> {
        Chrome {
            site_title: "ASIMO Technical Club",
            css: "",
            theme,
            unread: 2,
            year: 2025,
        }
    }

    fn site_context(root: &Path) -> AppContext {
        let config = load_config(root).unwrap();
        AppContext::for_site(root, config)
            .with_clock(Arc::new(FixedClock::at("2025-07-01T00:00:00Z")))
    }

    #[test]
    fn base_document_includes_doctype() {
        let doc = PageDocument::for_page(PageKind::Gallery);
        let html = render_page(&doc, &chrome(ThemePreference::Dark)).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Gallery | ASIMO Technical Club</title>"));
    }

    #[test]
    fn light_theme_sets_body_class() {
        let doc = PageDocument::for_page(PageKind::Home);
        let html = render_page(&doc, &chrome(ThemePreference::Light)).into_string();
        assert!(html.contains(r#"<body class="light-theme""#));
        assert!(html.contains("fa-moon"));

        let html = render_page(&doc, &chrome(ThemePreference::Dark)).into_string();
        assert!(html.contains("<body>"));
    }

    #[test]
    fn nav_marks_current_page() {
        let doc = PageDocument::for_page(PageKind::Teams);
        let html = render_page(&doc, &chrome(ThemePreference::Dark)).into_string();
        assert!(html.contains(r#"<li class="current"><a href="teams.html">"#));
        assert!(html.contains(r#"<li><a href="events.html">"#));
    }

    #[test]
    fn badge_only_when_new_notifications_flagged() {
        let mut doc = PageDocument::for_page(PageKind::Notifications);
        let html = render_page(&doc, &chrome(ThemePreference::Dark)).into_string();
        assert!(!html.contains(r#"class="notification-badge""#));

        doc.set_body_attr("data-new-notifications", "true");
        let html = render_page(&doc, &chrome(ThemePreference::Dark)).into_string();
        assert!(html.contains(r#"<span class="notification-badge">2</span>"#));
        assert!(html.contains(r#"data-new-notifications="true""#));
    }

    #[test]
    fn home_page_wraps_containers_in_sections() {
        let doc = PageDocument::for_page(PageKind::Home);
        let html = render_page(&doc, &chrome(ThemePreference::Dark)).into_string();
        for id in ["home", "about", "events", "workshops", "teams", "gallery"] {
            assert!(html.contains(&format!(r#"<section id="{id}">"#)), "{id}");
        }
        assert!(html.contains(r#"href="gallery.html""#));
    }

    #[test]
    fn sections_without_containers_are_skipped() {
        let doc = PageDocument::new(PageKind::Home, vec![Container::new(Slot::About)]);
        let html = render_page(&doc, &chrome(ThemePreference::Dark)).into_string();
        assert!(html.contains(r#"<section id="about">"#));
        assert!(!html.contains(r#"<section id="workshops">"#));
    }

    #[test]
    fn every_page_ends_with_site_script() {
        for kind in PageKind::ALL {
            let doc = PageDocument::for_page(kind);
            let html = render_page(&doc, &chrome(ThemePreference::Dark)).into_string();
            let body_end = html.rfind("</body>").unwrap();
            assert!(html[..body_end].ends_with("})();\n</script>"), "{kind:?}");
            assert!(html.contains("function initTheme()"));
        }
    }

    #[test]
    fn workshop_dialog_only_beside_workshop_cards() {
        let home = PageDocument::for_page(PageKind::Home);
        let html = render_page(&home, &chrome(ThemePreference::Dark)).into_string();
        assert!(html.contains(r#"id="workshopModal""#));
        assert!(html.contains(r#"id="workshopModalDescription""#));

        let gallery = PageDocument::for_page(PageKind::Gallery);
        let html = render_page(&gallery, &chrome(ThemePreference::Dark)).into_string();
        assert!(!html.contains(r#"id="workshopModal""#));
    }

    #[test]
    fn events_grid_gets_filter_tabs() {
        let mut grid = Container::new(Slot::EventsExtended);
        grid.set_attr("data-filter", "completed");
        let tabs = event_filter_tabs(&grid).into_string();
        assert_eq!(tabs.matches("filter-btn").count(), 4);
        assert!(opening_tag(&tabs, r#"data-filter="completed""#).contains("active"));
        assert!(!opening_tag(&tabs, r#"data-filter="all""#).contains("active"));
    }

    #[test]
    fn generate_writes_every_page_and_assets() {
        let site = setup_fixtures();
        let out = TempDir::new().unwrap();
        let summary = generate(&site_context(site.path()), site.path(), out.path()).unwrap();

        assert_eq!(summary.pages.len(), 5);
        for kind in PageKind::ALL {
            assert!(out.path().join(kind.file_name()).exists(), "{kind:?}");
        }
        assert!(summary.assets_copied >= 1);
        assert!(out.path().join("assets/images/about.png").exists());

        let index = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(index.contains("featured-banners-container"));
        assert!(index.contains(r#"data-content-ready="true""#));
        assert!(!index.contains(r#"class="content-loading""#));
    }

    #[test]
    fn generate_reports_each_page() {
        let site = setup_fixtures();
        let out = TempDir::new().unwrap();
        let summary = generate(&site_context(site.path()), site.path(), out.path()).unwrap();

        let home = summary.pages.iter().find(|p| p.kind == PageKind::Home).unwrap();
        let report = home.report.as_ref().unwrap();
        assert!(report.failed.is_empty());
        assert_eq!(report.rendered.len(), 7);
    }

    #[test]
    fn generate_uses_stored_theme() {
        let site = setup_fixtures();
        let out = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        store.set(THEME_KEY, "light").unwrap();
        let ctx = site_context(site.path()).with_store(store);

        let summary = generate(&ctx, site.path(), out.path()).unwrap();
        assert_eq!(summary.theme, ThemePreference::Light);
        let page = fs::read_to_string(out.path().join("gallery.html")).unwrap();
        assert!(page.contains(r#"class="light-theme""#));
    }

    #[test]
    fn missing_assets_dir_copies_nothing() {
        let site = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        assert_eq!(copy_assets(site.path(), out.path()).unwrap(), 0);
    }
}
