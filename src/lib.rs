//! # Club Site
//!
//! A static site generator for a college technical club. The club's content
//! lives in a handful of JSON documents (events, workshops, team roster,
//! gallery, featured banners, about text, notifications); every page is built
//! by running the content-manager layer over that page's containers.
//!
//! # Architecture: Load → Shape → Paint
//!
//! Every page goes through the same three steps, driven by
//! [`content::ContentManager::init`]:
//!
//! ```text
//! 1. Load    data/*.json  →  managers       (all resources, in parallel)
//! 2. Shape   managers     →  view models    (filter, sort, slice; pure functions)
//! 3. Paint   view models  →  containers     (maud fragments into the PageDocument)
//! ```
//!
//! Shaping is kept apart from painting so the ordering and slicing rules can
//! be tested without looking at markup: `events::featured_events`,
//! `gallery::preview_items`, `featured::strip_slides` and friends are plain
//! functions over slices.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Orchestrator: `AppContext` wiring, parallel loads, join policy, page rendering |
//! | [`dom`] | `PageDocument` and `Container`, the server-side stand-in for the page DOM |
//! | [`routing`] | Page identification from paths, team batch deep links |
//! | [`source`] | `ResourceSource` trait: site directory or in-memory JSON documents |
//! | [`types`] | Serde types for every JSON document |
//! | [`events`] | Featured timeline, full list and filtered grid of events |
//! | [`workshops`] | Featured workshop cards |
//! | [`teams`] | Batch cards, quotes and per-batch member sections |
//! | [`gallery`] | Gallery preview and page, image existence probing |
//! | [`about`] | About section with a built-in fallback |
//! | [`featured`] | Featured banner strip and indicators |
//! | [`carousel`] | Carousel state machine with an explicit clock |
//! | [`notifications`] | Notification list, read state and "new since last visit" |
//! | [`store`] | Local key-value store and the theme preference |
//! | [`config`] | `config.toml` loading, validation, merging and CSS generation |
//! | [`generate`] | Writes the finished HTML pages and copies assets |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Dependencies
//!
//! Everything a manager touches from the outside world arrives through
//! [`content::AppContext`]: the resource source, the image probe, the local
//! store, the clock, render hooks and the notification signal. Tests swap any
//! of them for in-memory versions; optional collaborators default to no-ops.
//!
//! ## Explicit Time
//!
//! The carousel never reads the wall clock. Callers pass the current time as
//! a `Duration` since start to every operation and call `tick` to let timers
//! fire. Notifications read time through the [`notifications::Clock`] trait.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system. Malformed templates are build errors and every
//! interpolation is escaped.
//!
//! ## Failures Stay Local
//!
//! A resource that fails to load is logged and leaves its manager empty; the
//! sections that depend on it show a refresh-the-page message while the rest
//! of the page renders normally. `[loading] policy = "all_or_nothing"` opts
//! into failing the whole page instead.

pub mod about;
pub mod carousel;
pub mod config;
pub mod content;
pub mod dom;
pub mod events;
pub mod featured;
pub mod gallery;
pub mod generate;
pub mod notifications;
pub mod output;
pub mod routing;
pub mod source;
pub mod store;
pub mod teams;
pub mod types;
pub mod workshops;

#[cfg(test)]
pub(crate) mod test_helpers;
