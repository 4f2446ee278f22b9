//! Picks the single best trailer for a movie.
//!
//! Priority is strict and nothing is merged: the first local trailer wins,
//! otherwise the first remote trailer, otherwise there is no trailer. A movie
//! without trailers is a normal outcome and yields `None`.

use trailerforged_common::{MovieRef, TrailerDescriptor, TrailerOrigin};

use super::source::{source_label, LOCAL_FILE_LABEL};

/// Resolve the trailer to preview for `movie`.
pub fn resolve(movie: &MovieRef) -> Option<TrailerDescriptor> {
    if let Some(local) = movie.local_trailers.first() {
        tracing::trace!(
            movie = %movie.name,
            local = movie.local_trailers.len(),
            remote = movie.remote_trailers.len(),
            "Resolved local trailer"
        );
        return Some(TrailerDescriptor {
            id: local.id.to_string(),
            name: local.name.clone(),
            path: local.path.to_string_lossy().to_string(),
            runtime_seconds: local.runtime_seconds,
            origin: TrailerOrigin::Local,
            source: LOCAL_FILE_LABEL.to_string(),
        });
    }

    if let Some(remote) = movie.remote_trailers.first() {
        tracing::trace!(
            movie = %movie.name,
            remote = movie.remote_trailers.len(),
            "Resolved remote trailer"
        );
        return Some(TrailerDescriptor {
            id: movie.id.to_string(),
            name: remote
                .name
                .clone()
                .unwrap_or_else(|| format!("{} Trailer", movie.name)),
            path: remote.url.clone(),
            runtime_seconds: None,
            origin: TrailerOrigin::Remote,
            source: source_label(&remote.url),
        });
    }

    None
}

/// Whether `movie` already has a trailer that makes a download pointless.
pub fn has_trailer(movie: &MovieRef) -> bool {
    resolve(movie).is_some()
}
