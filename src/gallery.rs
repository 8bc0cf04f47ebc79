//! Gallery preview, the gallery page, and the image existence check.
//!
//! Every image reference can be probed before painting through an
//! [`ImageProbe`]. Probes run as a rayon parallel iterator; results are
//! collected in item order. An item whose probe fails, or that has no image
//! at all, is painted as a placeholder glyph with its placeholder text.
//! Images that pass still carry an `onerror` handler that swaps in the same
//! placeholder if the browser later fails to paint them.

use crate::dom::{Container, stagger_delay};
use crate::source::{self, ResourceSource, fetch_json};
use crate::types::{GalleryDocument, GalleryItem};
use maud::{Markup, html};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const DEFAULT_PREVIEW: usize = 3;
const PREVIEW_STAGGER_MS: u64 = 30;
const PAGE_STAGGER_MS: u64 = 20;

/// Answers whether an image reference can be displayed.
pub trait ImageProbe: Send + Sync {
    fn exists(&self, reference: &str) -> bool;
}

/// Probe that reports every image as present.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumePresent;

impl ImageProbe for AssumePresent {
    fn exists(&self, _reference: &str) -> bool {
        true
    }
}

/// Probes images under a site root by decoding their header.
///
/// Remote `http(s)` references cannot be checked offline and are reported
/// as present.
#[derive(Debug, Clone)]
pub struct FsImageProbe {
    root: PathBuf,
}

impl FsImageProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageProbe for FsImageProbe {
    fn exists(&self, reference: &str) -> bool {
        if is_remote(reference) {
            return true;
        }
        let path = self.root.join(reference.trim_start_matches("./"));
        let result = image::ImageReader::open(&path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(image::ImageError::IoError)
            .and_then(|reader| reader.into_dimensions());
        match result {
            Ok((w, h)) => {
                debug!(path = %path.display(), width = w, height = h, "image probe ok");
                true
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "image probe failed");
                false
            }
        }
    }
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// The first `count` items, for the home page.
pub fn preview_items(items: &[GalleryItem], count: usize) -> &[GalleryItem] {
    &items[..count.min(items.len())]
}

/// One gallery entry ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryTile<'a> {
    pub item: &'a GalleryItem,
    /// The image to show, or `None` for the placeholder glyph.
    pub image: Option<&'a str>,
}

/// Probe every item's image concurrently; order follows `items`.
pub fn validate_items<'a>(
    items: &'a [GalleryItem],
    probe: &dyn ImageProbe,
) -> Vec<GalleryTile<'a>> {
    items
        .par_iter()
        .map(|item| {
            let image = item.image.as_deref().filter(|image| {
                let ok = probe.exists(image);
                if !ok {
                    warn!(image, title = %item.title, "image not found, using placeholder");
                }
                ok
            });
            GalleryTile { item, image }
        })
        .collect()
}

/// Where a gallery render goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryScope {
    /// Home page: the first N items as overlay cards.
    Preview(usize),
    /// Gallery page: every item.
    Page,
}

#[derive(Debug, Clone)]
pub struct GalleryManager {
    items: Option<Vec<GalleryItem>>,
    preview: usize,
}

impl Default for GalleryManager {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW)
    }
}

impl GalleryManager {
    pub fn new(preview: usize) -> Self {
        Self {
            items: None,
            preview,
        }
    }

    pub fn load(&mut self, source: &dyn ResourceSource) -> Option<&[GalleryItem]> {
        match fetch_json::<GalleryDocument>(source, source::GALLERY) {
            Ok(doc) => self.items = Some(doc.gallery),
            Err(e) => {
                warn!(error = %e, "failed to load gallery");
                self.items = None;
            }
        }
        self.items.as_deref()
    }

    pub fn items(&self) -> Option<&[GalleryItem]> {
        self.items.as_deref()
    }

    /// Append an item to the loaded collection.
    pub fn add_item(&mut self, item: GalleryItem) {
        self.items.get_or_insert_with(Vec::new).push(item);
    }

    /// Home page preview without probing.
    pub fn render(&self, container: &mut Container) {
        self.render_with_validation(container, &AssumePresent, GalleryScope::Preview(self.preview));
    }

    pub fn render_with_validation(
        &self,
        container: &mut Container,
        probe: &dyn ImageProbe,
        scope: GalleryScope,
    ) {
        let Some(items) = self.items() else { return };
        let items = match scope {
            GalleryScope::Preview(n) => preview_items(items, n),
            GalleryScope::Page => items,
        };
        let tiles = validate_items(items, probe);
        container.clear();
        for (i, tile) in tiles.iter().enumerate() {
            container.append(match scope {
                GalleryScope::Preview(_) => preview_tile(tile, i),
                GalleryScope::Page => page_tile(tile, i),
            });
        }
    }
}

fn placeholder(text: &str) -> Markup {
    html! {
        div.gallery-placeholder {
            i.fas.fa-image {}
            span { (text) }
        }
    }
}

/// `onerror` handler replacing the image's container with the placeholder.
fn placeholder_script(text: &str) -> String {
    let literal = serde_json::Value::String(placeholder(text).into_string());
    format!("this.parentElement.innerHTML={literal}")
}

fn preview_tile(tile: &GalleryTile, index: usize) -> Markup {
    let item = tile.item;
    html! {
        div.gallery-item.glass-container
            data-aos="fade-up"
            data-aos-delay=(stagger_delay(index, PREVIEW_STAGGER_MS))
        {
            @match tile.image {
                Some(src) => {
                    div.gallery-image-container {
                        img src=(src) alt=(item.title) loading="lazy"
                            onerror=(placeholder_script(item.placeholder_text()));
                        div.gallery-overlay {
                            h3 { (item.title) }
                            p { (item.description) }
                        }
                    }
                }
                None => (placeholder(item.placeholder_text())),
            }
        }
    }
}

fn page_tile(tile: &GalleryTile, index: usize) -> Markup {
    let item = tile.item;
    html! {
        div.gallery-card data-aos="fade-up" data-aos-delay=(stagger_delay(index, PAGE_STAGGER_MS)) {
            @match tile.image {
                Some(src) => {
                    div.gallery-image-container {
                        img src=(src) alt=(item.title) loading="lazy"
                            onerror=(placeholder_script(item.placeholder_text()));
                    }
                }
                None => (placeholder(item.placeholder_text())),
            }
        }
    }
}
