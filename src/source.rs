//! Where JSON resources come from.
//!
//! Every manager reads exactly one document by its site-relative path. The
//! [`ResourceSource`] trait is the seam: [`DirSource`] reads from a site
//! directory on disk, [`MemorySource`] serves documents held in memory.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const EVENTS: &str = "data/events.json";
pub const WORKSHOPS: &str = "data/workshops.json";
pub const MEMBERS: &str = "data/members.json";
pub const GALLERY: &str = "data/gallery.json";
pub const FEATURED: &str = "data/featured.json";
pub const ABOUT: &str = "data/about.json";
pub const NOTIFICATIONS: &str = "data/notifications.json";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A provider of raw resource bodies keyed by relative path.
pub trait ResourceSource: Send + Sync {
    fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// Fetch `path` and parse it as `T`.
pub fn fetch_json<T: DeserializeOwned>(
    source: &dyn ResourceSource,
    path: &str,
) -> Result<T, FetchError> {
    let body = source.fetch(path)?;
    serde_json::from_str(&body).map_err(|source| FetchError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Reads resources relative to a site root directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceSource for DirSource {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let full = self.root.join(path.trim_start_matches("./"));
        fs::read_to_string(&full).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FetchError::NotFound(path.to_string()),
            _ => FetchError::Io {
                path: path.to_string(),
                source: e,
            },
        })
    }
}

/// Serves resources from memory. Missing paths are `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: impl Into<String>) -> Self {
        self.insert(path, body);
        self
    }

    pub fn insert(&mut self, path: &str, body: impl Into<String>) {
        self.documents.insert(path.to_string(), body.into());
    }
}

impl ResourceSource for MemorySource {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}
