//! External metadata lookups used to find trailer URLs.
//!
//! # Module layout
//!
//! - [`MetadataApiClient`] -- Trait the download orchestrator depends on.
//! - [`tmdb`] -- TMDB v3 implementation.

pub mod tmdb;

pub use tmdb::TmdbClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trailerforged_common::Result;

/// Video type accepted as a trailer.
const TRAILER_TYPE: &str = "Trailer";

/// Hosting site the downloader is pointed at.
const SUPPORTED_SITE: &str = "YouTube";

/// A single video record attached to a movie by the metadata service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    /// Site-specific video key (e.g. a YouTube video id).
    pub key: String,
    /// Hosting site, e.g. "YouTube".
    pub site: String,
    /// Video kind, e.g. "Trailer", "Teaser", "Featurette".
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

/// Async client for the external metadata service.
///
/// Network failures, timeouts, non-2xx responses and malformed bodies are
/// all reported as retryable [`trailerforged_common::Error::ExternalService`].
#[async_trait]
pub trait MetadataApiClient: Send + Sync {
    /// Fetch every video attached to the movie with the given external id.
    async fn movie_videos(&self, external_id: &str) -> Result<Vec<VideoResult>>;
}

/// Pick the first YouTube trailer and return its watch URL.
pub fn select_trailer_url(videos: &[VideoResult]) -> Option<String> {
    videos
        .iter()
        .find(|v| v.kind == TRAILER_TYPE && v.site == SUPPORTED_SITE && !v.key.is_empty())
        .map(|v| format!("https://www.youtube.com/watch?v={}", v.key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(key: &str, site: &str, kind: &str) -> VideoResult {
        VideoResult {
            key: key.into(),
            site: site.into(),
            kind: kind.into(),
            name: String::new(),
        }
    }

    #[test]
    fn selects_first_youtube_trailer() {
        let videos = vec![
            video("t1", "YouTube", "Teaser"),
            video("v1", "Vimeo", "Trailer"),
            video("y1", "YouTube", "Trailer"),
            video("y2", "YouTube", "Trailer"),
        ];
        assert_eq!(
            select_trailer_url(&videos).as_deref(),
            Some("https://www.youtube.com/watch?v=y1")
        );
    }

    #[test]
    fn no_eligible_video() {
        assert_eq!(select_trailer_url(&[]), None);
        assert_eq!(
            select_trailer_url(&[video("c1", "YouTube", "Clip"), video("v", "Vimeo", "Trailer")]),
            None
        );
    }

    #[test]
    fn video_result_deserializes_type_field() {
        let v: VideoResult = serde_json::from_str(
            r#"{"key":"abc","site":"YouTube","type":"Trailer","name":"Official Trailer","size":1080}"#,
        )
        .unwrap();
        assert_eq!(v.kind, "Trailer");
        assert_eq!(v.name, "Official Trailer");
    }
}
