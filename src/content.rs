//! Page orchestration.
//!
//! A [`ContentManager`] owns one instance of every manager, built from an
//! [`AppContext`]. [`ContentManager::init`] loads every resource in parallel
//! on the rayon pool, renders the subset the page has containers for, checks
//! for new notifications, and finally hands the document to the configured
//! [`RenderHooks`].
//!
//! How a failed resource affects the rest of the page is decided by
//! [`LoadPolicy`]:
//!
//! - `Independent`: everything that loaded is rendered; sections whose
//!   resource failed show the refresh-the-page message.
//! - `AllOrNothing`: a failed core resource (events, workshops, teams,
//!   gallery) puts that message into every section still loading and
//!   nothing is rendered.
//!
//! Featured banners and the about section have their own fallbacks and are
//! never shown as errors.

use crate::about::AboutManager;
use crate::carousel::Carousel;
use crate::config::{LoadPolicy, SiteConfig};
use crate::dom::{LoadState, PageDocument, Slot};
use crate::events::{EventFilter, EventsManager};
use crate::featured::FeaturedManager;
use crate::gallery::{AssumePresent, FsImageProbe, GalleryManager, GalleryScope, ImageProbe};
use crate::notifications::{
    Clock, NoSignal, NotificationManager, NotificationSignal, SystemClock,
};
use crate::routing::{PageKind, batch_from_url};
use crate::source::{DirSource, ResourceSource};
use crate::store::{FileStore, LocalStore, MemoryStore};
use crate::teams::TeamsManager;
use crate::workshops::WorkshopsManager;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Runs once a page has been rendered.
pub trait RenderHooks: Send + Sync {
    fn after_render(&self, doc: &mut PageDocument);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl RenderHooks for NoHooks {
    fn after_render(&self, _doc: &mut PageDocument) {}
}

/// Marks the body with `data-content-ready` so page scripts can re-arm
/// animations for the freshly rendered nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentReadyMarker;

impl RenderHooks for ContentReadyMarker {
    fn after_render(&self, doc: &mut PageDocument) {
        doc.set_body_attr("data-content-ready", "true");
    }
}

/// Everything a [`ContentManager`] depends on.
#[derive(Clone)]
pub struct AppContext {
    pub config: SiteConfig,
    pub source: Arc<dyn ResourceSource>,
    pub probe: Arc<dyn ImageProbe>,
    pub store: Arc<dyn LocalStore>,
    pub clock: Arc<dyn Clock>,
    pub hooks: Arc<dyn RenderHooks>,
    pub signal: Arc<dyn NotificationSignal>,
}

impl AppContext {
    /// A context with in-memory storage and no-op collaborators.
    pub fn new(config: SiteConfig, source: Arc<dyn ResourceSource>) -> Self {
        Self {
            config,
            source,
            probe: Arc::new(AssumePresent),
            store: Arc::new(MemoryStore::new()),
            clock: Arc::new(SystemClock),
            hooks: Arc::new(NoHooks),
            signal: Arc::new(NoSignal),
        }
    }

    /// A context reading from a site directory on disk, with the local store
    /// at the configured path under `root`.
    pub fn for_site(root: &Path, config: SiteConfig) -> Self {
        let store = FileStore::new(root.join(&config.site.storage));
        Self::new(config, Arc::new(DirSource::new(root)))
            .with_probe(Arc::new(FsImageProbe::new(root)))
            .with_store(Arc::new(store))
            .with_hooks(Arc::new(ContentReadyMarker))
    }

    pub fn with_probe(mut self, probe: Arc<dyn ImageProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn LocalStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RenderHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_signal(mut self, signal: Arc<dyn NotificationSignal>) -> Self {
        self.signal = signal;
        self
    }
}

/// The JSON resources a page load fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Events,
    Workshops,
    Teams,
    Gallery,
    Featured,
    About,
    Notifications,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Events => "events",
            Resource::Workshops => "workshops",
            Resource::Teams => "teams",
            Resource::Gallery => "gallery",
            Resource::Featured => "featured",
            Resource::About => "about",
            Resource::Notifications => "notifications",
        }
    }

    /// Whether a failure counts against the all-or-nothing policy.
    pub fn is_core(self) -> bool {
        matches!(
            self,
            Resource::Events | Resource::Workshops | Resource::Teams | Resource::Gallery
        )
    }

    /// Sections that show the error message when this resource fails.
    fn error_slots(self) -> &'static [Slot] {
        match self {
            Resource::Events => &[Slot::EventsTimeline, Slot::AllEvents, Slot::EventsExtended],
            Resource::Workshops => &[Slot::WorkshopsGrid],
            Resource::Teams => &[Slot::BatchGrid, Slot::QuotesStack, Slot::TeamSections],
            Resource::Gallery => &[Slot::GalleryGrid, Slot::GalleryExtended],
            Resource::Notifications => &[Slot::Notifications],
            Resource::Featured | Resource::About => &[],
        }
    }
}

/// What one `init` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub page: PageKind,
    pub loaded: Vec<Resource>,
    pub failed: Vec<Resource>,
    /// Sections that went from loading to rendered content.
    pub rendered: Vec<Slot>,
    /// Sections showing the refresh-the-page message.
    pub errors: Vec<Slot>,
    /// The all-or-nothing policy tripped and nothing was rendered.
    pub degraded: bool,
    pub has_new_notifications: bool,
    pub unread_notifications: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Initialized(InitReport),
    AlreadyInitialized,
}

impl InitOutcome {
    pub fn report(&self) -> Option<&InitReport> {
        match self {
            InitOutcome::Initialized(report) => Some(report),
            InitOutcome::AlreadyInitialized => None,
        }
    }
}

pub struct ContentManager {
    ctx: AppContext,
    events: EventsManager,
    workshops: WorkshopsManager,
    teams: TeamsManager,
    gallery: GalleryManager,
    featured: FeaturedManager,
    about: AboutManager,
    notifications: NotificationManager,
    carousel: Option<Carousel>,
    selected_batch: Option<String>,
    event_filter: EventFilter,
    initialized: bool,
}

impl ContentManager {
    pub fn new(ctx: AppContext) -> Self {
        let config = &ctx.config;
        let notifications =
            NotificationManager::new(ctx.store.clone(), ctx.clock.clone(), ctx.signal.clone());
        Self {
            events: EventsManager::new(config.home.max_featured_events),
            workshops: WorkshopsManager::new(),
            teams: TeamsManager::new(),
            gallery: GalleryManager::new(config.home.gallery_preview),
            featured: FeaturedManager::new(config.carousel.mode, config.carousel.timing()),
            about: AboutManager::new(),
            notifications,
            carousel: None,
            selected_batch: None,
            event_filter: EventFilter::All,
            initialized: false,
            ctx,
        }
    }

    /// Take the deep-linked batch from the page URL.
    pub fn with_url(mut self, url: &str) -> Self {
        self.selected_batch = batch_from_url(url);
        self
    }

    pub fn with_event_filter(mut self, filter: EventFilter) -> Self {
        self.event_filter = filter;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn events(&self) -> &EventsManager {
        &self.events
    }

    pub fn workshops(&self) -> &WorkshopsManager {
        &self.workshops
    }

    pub fn teams(&self) -> &TeamsManager {
        &self.teams
    }

    pub fn gallery(&self) -> &GalleryManager {
        &self.gallery
    }

    pub fn featured(&self) -> &FeaturedManager {
        &self.featured
    }

    pub fn about(&self) -> &AboutManager {
        &self.about
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationManager {
        &mut self.notifications
    }

    /// The featured carousel, once the home page has been rendered.
    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    pub fn carousel_mut(&mut self) -> Option<&mut Carousel> {
        self.carousel.as_mut()
    }

    /// Load everything and render `doc`. A second call does nothing.
    pub fn init(&mut self, doc: &mut PageDocument) -> InitOutcome {
        if self.initialized {
            debug!(page = doc.kind().title(), "content already initialized");
            return InitOutcome::AlreadyInitialized;
        }

        let pending: Vec<Slot> = doc
            .containers()
            .iter()
            .filter(|c| c.state() == LoadState::Loading)
            .map(|c| c.slot())
            .collect();

        let (loaded, failed) = self.load_all();
        for resource in &failed {
            warn!(resource = resource.as_str(), "resource unavailable");
        }

        let degraded = self.ctx.config.loading.policy == LoadPolicy::AllOrNothing
            && failed.iter().any(|r| r.is_core());
        if degraded {
            warn!("core content failed to load, showing error state");
            doc.show_error_everywhere();
        } else {
            self.render_page(doc);
            for resource in &failed {
                for slot in resource.error_slots() {
                    if let Some(container) = doc.container_mut(*slot) {
                        container.show_error();
                    }
                }
            }
        }

        let has_new_notifications = self.notifications.has_new_notifications();
        if has_new_notifications {
            self.ctx.signal.show_new();
            doc.set_body_attr("data-new-notifications", "true");
        }

        self.ctx.hooks.after_render(doc);
        self.initialized = true;

        let state_of = |slot: Slot| doc.container(slot).map(|c| c.state());
        let rendered: Vec<Slot> = pending
            .iter()
            .copied()
            .filter(|s| state_of(*s) == Some(LoadState::Settled))
            .collect();
        let errors: Vec<Slot> = doc
            .containers()
            .iter()
            .filter(|c| c.state() == LoadState::Failed)
            .map(|c| c.slot())
            .collect();

        info!(
            page = doc.kind().title(),
            loaded = loaded.len(),
            failed = failed.len(),
            rendered = rendered.len(),
            "content initialized"
        );

        InitOutcome::Initialized(InitReport {
            page: doc.kind(),
            loaded,
            failed,
            rendered,
            errors,
            degraded,
            has_new_notifications,
            unread_notifications: self.notifications.unread_count(),
        })
    }

    /// Fetch every resource concurrently.
    fn load_all(&mut self) -> (Vec<Resource>, Vec<Resource>) {
        let Self {
            ctx,
            events,
            workshops,
            teams,
            gallery,
            featured,
            about,
            notifications,
            ..
        } = self;
        let source: &dyn ResourceSource = ctx.source.as_ref();

        let (core, extras) = rayon::join(
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || events.load(source).is_some(),
                            || workshops.load(source).is_some(),
                        )
                    },
                    || {
                        rayon::join(
                            || teams.load(source).is_some(),
                            || gallery.load(source).is_some(),
                        )
                    },
                )
            },
            || {
                rayon::join(
                    || featured.load(source).is_some(),
                    || {
                        rayon::join(
                            || about.load(source).is_some(),
                            || notifications.load(source).is_some(),
                        )
                    },
                )
            },
        );
        let ((events_ok, workshops_ok), (teams_ok, gallery_ok)) = core;
        let (featured_ok, (about_ok, notes_ok)) = extras;

        let outcomes = [
            (Resource::Events, events_ok),
            (Resource::Workshops, workshops_ok),
            (Resource::Teams, teams_ok),
            (Resource::Gallery, gallery_ok),
            (Resource::Featured, featured_ok),
            (Resource::About, about_ok),
            (Resource::Notifications, notes_ok),
        ];
        let loaded = outcomes.iter().filter(|(_, ok)| *ok).map(|(r, _)| *r).collect();
        let failed = outcomes.iter().filter(|(_, ok)| !*ok).map(|(r, _)| *r).collect();
        (loaded, failed)
    }

    /// Render whatever `doc` has containers for. Missing containers are
    /// skipped. Safe to call repeatedly.
    pub fn render_page(&mut self, doc: &mut PageDocument) {
        match doc.kind() {
            PageKind::Home => self.render_home(doc),
            PageKind::Events => {
                if let Some(c) = doc.container_mut(Slot::AllEvents) {
                    self.events.render_all(c);
                }
                if let Some(c) = doc.container_mut(Slot::EventsExtended) {
                    self.events.render_filtered(c, self.event_filter);
                }
            }
            PageKind::Gallery => {
                if let Some(c) = doc.container_mut(Slot::GalleryExtended) {
                    self.gallery
                        .render_with_validation(c, self.ctx.probe.as_ref(), GalleryScope::Page);
                }
            }
            PageKind::Teams => {
                if let Some(c) = doc.container_mut(Slot::TeamSections) {
                    self.teams
                        .render_team_sections(c, self.selected_batch.as_deref());
                }
            }
            PageKind::Notifications => {
                if let Some(c) = doc.container_mut(Slot::Notifications) {
                    self.notifications.render(c);
                }
            }
        }
    }

    fn render_home(&mut self, doc: &mut PageDocument) {
        let carousel = self
            .carousel
            .get_or_insert_with(|| self.featured.carousel(Duration::ZERO));
        if let (Some(strip), indicators) =
            doc.container_pair_mut(Slot::FeaturedBanners, Slot::BannerIndicators)
        {
            self.featured.render(strip, indicators, carousel);
        }
        if let Some(c) = doc.container_mut(Slot::About) {
            self.about.render(c);
        }
        if let Some(c) = doc.container_mut(Slot::EventsTimeline) {
            self.events.render_featured(c);
        }
        if let Some(c) = doc.container_mut(Slot::WorkshopsGrid) {
            self.workshops.render(c);
        }
        if let Some(c) = doc.container_mut(Slot::BatchGrid) {
            self.teams.render_batches(c);
        }
        if let Some(c) = doc.container_mut(Slot::QuotesStack) {
            self.teams.render_quotes(c);
        }
        if let Some(c) = doc.container_mut(Slot::GalleryGrid) {
            let scope = GalleryScope::Preview(self.ctx.config.home.gallery_preview);
            self.gallery
                .render_with_validation(c, self.ctx.probe.as_ref(), scope);
        }
    }
}
