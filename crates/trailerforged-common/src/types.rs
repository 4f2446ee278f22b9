//! Movie snapshots and resolved trailer descriptors.
//!
//! [`MovieRef`] is what the library catalog hands out; the core only reads
//! it. [`TrailerDescriptor`] is the single value a resolution produces and is
//! serialized in camelCase for the preview client.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::ids::{MovieId, TrailerId};

/// How a trailer was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrailerOrigin {
    /// A trailer file indexed next to the movie.
    Local,
    /// An externally hosted trailer URL stored in the movie's metadata.
    Remote,
    /// A trailer fetched on demand by the downloader.
    Downloaded,
}

impl fmt::Display for TrailerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "Local"),
            Self::Remote => write!(f, "Remote"),
            Self::Downloaded => write!(f, "Downloaded"),
        }
    }
}

/// A trailer file stored alongside a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTrailer {
    pub id: TrailerId,
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub runtime_seconds: Option<u32>,
}

impl LocalTrailer {
    /// Build a local trailer whose id and name derive from its path.
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self {
            id: TrailerId::from_path(&path),
            name,
            path,
            runtime_seconds: None,
        }
    }
}

/// An externally hosted trailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTrailer {
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
}

/// Read-only snapshot of a movie as provided by the library catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRef {
    pub id: MovieId,
    pub name: String,
    /// Path of the movie's main video file.
    pub path: PathBuf,
    /// Local trailers in catalog order.
    #[serde(default)]
    pub local_trailers: Vec<LocalTrailer>,
    /// Remote trailers in catalog order.
    #[serde(default)]
    pub remote_trailers: Vec<RemoteTrailer>,
    /// External catalog keys, e.g. `{"tmdb": "348"}`.
    #[serde(default)]
    pub provider_ids: BTreeMap<String, String>,
}

impl MovieRef {
    /// Create a movie with no trailers and no provider ids.
    pub fn new(id: MovieId, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
            local_trailers: Vec::new(),
            remote_trailers: Vec::new(),
            provider_ids: BTreeMap::new(),
        }
    }

    /// Look up a provider id by case-insensitive provider name.
    ///
    /// Blank values are treated as absent.
    pub fn provider_id(&self, provider: &str) -> Option<&str> {
        self.provider_ids
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(provider))
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// The single trailer chosen for a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailerDescriptor {
    pub id: String,
    pub name: String,
    /// Local file path or remote URL, verbatim.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub runtime_seconds: Option<u32>,
    pub origin: TrailerOrigin,
    /// Human-readable source, e.g. "Local File" or "YouTube".
    pub source: String,
}
