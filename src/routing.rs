//! Path-based page routing and team deep links.
//!
//! Pages are identified purely by the last path segment. Team sections are
//! deep-linked either with a `batch` query parameter or a `#batch-<year>`
//! fragment; links generated by the batch cards carry both.

use url::Url;

/// The pages that receive dynamic content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageKind {
    Home,
    Events,
    Gallery,
    Teams,
    Notifications,
}

impl PageKind {
    pub const ALL: [PageKind; 5] = [
        PageKind::Home,
        PageKind::Events,
        PageKind::Gallery,
        PageKind::Teams,
        PageKind::Notifications,
    ];

    /// Resolve a request path like `/club/events.html` to a page.
    ///
    /// An empty last segment (`/` or `""`) is the home page. Unknown pages
    /// return `None`: they get no dynamic content.
    pub fn from_path(path: &str) -> Option<PageKind> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.rsplit('/').next().unwrap_or_default() {
            "" | "index.html" => Some(PageKind::Home),
            "events.html" => Some(PageKind::Events),
            "gallery.html" => Some(PageKind::Gallery),
            "teams.html" => Some(PageKind::Teams),
            "notifications.html" => Some(PageKind::Notifications),
            _ => None,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            PageKind::Home => "index.html",
            PageKind::Events => "events.html",
            PageKind::Gallery => "gallery.html",
            PageKind::Teams => "teams.html",
            PageKind::Notifications => "notifications.html",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PageKind::Home => "Home",
            PageKind::Events => "Events",
            PageKind::Gallery => "Gallery",
            PageKind::Teams => "Teams",
            PageKind::Notifications => "Notifications",
        }
    }
}

/// Link from a batch card to its section on the teams page.
pub fn batch_link(year: &str) -> String {
    format!("teams.html?batch={}#batch-{year}", urlencoding::encode(year))
}

/// Element id of a batch section on the teams page.
pub fn batch_anchor(year: &str) -> String {
    format!("batch-{year}")
}

/// Relative page links are resolved against this origin before parsing.
const PAGE_BASE: &str = "http://localhost/";

/// Batch year selected by a URL, if any.
///
/// The `batch` query parameter wins over the `#batch-<year>` fragment. Query
/// values are form-decoded, so `%20` and `+` both become a space.
pub fn batch_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(PAGE_BASE).and_then(|base| base.join(url)).ok()?;
    let from_query = parsed
        .query_pairs()
        .find(|(key, _)| *key == "batch")
        .map(|(_, value)| value.into_owned())
        .filter(|v| !v.is_empty());
    from_query.or_else(|| {
        parsed
            .fragment()
            .and_then(|h| h.strip_prefix("batch-"))
            .filter(|y| !y.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_home() {
        assert_eq!(PageKind::from_path(""), Some(PageKind::Home));
        assert_eq!(PageKind::from_path("/"), Some(PageKind::Home));
        assert_eq!(PageKind::from_path("/club/index.html"), Some(PageKind::Home));
    }

    #[test]
    fn known_pages_resolve() {
        assert_eq!(PageKind::from_path("/events.html"), Some(PageKind::Events));
        assert_eq!(
            PageKind::from_path("site/notifications.html"),
            Some(PageKind::Notifications)
        );
        assert_eq!(
            PageKind::from_path("/teams.html?batch=2023#batch-2023"),
            Some(PageKind::Teams)
        );
    }

    #[test]
    fn unknown_page_has_no_dynamic_content() {
        assert_eq!(PageKind::from_path("/contact.html"), None);
    }

    #[test]
    fn file_names_round_trip_through_routing() {
        for kind in PageKind::ALL {
            assert_eq!(PageKind::from_path(kind.file_name()), Some(kind));
        }
    }

    #[test]
    fn batch_link_resolves_back_to_year() {
        let link = batch_link("2022");
        assert_eq!(link, "teams.html?batch=2022#batch-2022");
        assert_eq!(batch_from_url(&link).as_deref(), Some("2022"));
    }

    #[test]
    fn query_wins_over_hash() {
        assert_eq!(
            batch_from_url("teams.html?batch=2021#batch-2023").as_deref(),
            Some("2021")
        );
    }

    #[test]
    fn hash_alone_selects_batch() {
        assert_eq!(
            batch_from_url("teams.html#batch-2023").as_deref(),
            Some("2023")
        );
    }

    #[test]
    fn no_batch_selector() {
        assert_eq!(batch_from_url("teams.html"), None);
        assert_eq!(batch_from_url("teams.html?view=grid#top"), None);
        assert_eq!(batch_from_url("teams.html?batch=#batch-"), None);
    }

    #[test]
    fn query_value_is_percent_decoded() {
        assert_eq!(
            batch_from_url("teams.html?batch=2024%20A").as_deref(),
            Some("2024 A")
        );
        assert_eq!(
            batch_from_url("/club/teams.html?view=grid&batch=2024+A#top").as_deref(),
            Some("2024 A")
        );
    }

    #[test]
    fn batch_link_encodes_the_query_value() {
        let link = batch_link("2024 A");
        assert_eq!(link, "teams.html?batch=2024%20A#batch-2024 A");
        assert_eq!(batch_from_url(&link).as_deref(), Some("2024 A"));
    }
}
