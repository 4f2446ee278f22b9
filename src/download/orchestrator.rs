//! Last-resort trailer downloads.
//!
//! A download only happens when a movie has neither a local nor a remote
//! trailer. The trailer URL is looked up through the metadata service and
//! handed to yt-dlp. Transient failures (metadata service hiccups, non-zero
//! downloader exits) are retried with exponential backoff; terminal ones
//! (no external id, no candidate URL, missing executable, timeout) are not.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use trailerforged_common::paths::{find_movie_trailer, trailer_stem};
use trailerforged_common::{
    DownloaderErrorKind, Error, MovieRef, Result, TrailerDescriptor, TrailerId, TrailerOrigin,
};

use super::process::{ProcessCommand, ProcessRunner};
use super::ytdlp::{TrailerQuality, YtDlpRequest};
use crate::config::DownloadConfig;
use crate::metadata::{select_trailer_url, MetadataApiClient};
use crate::trailers;

/// Provider key holding the TMDb id in [`MovieRef::provider_ids`].
pub const EXTERNAL_ID_PROVIDER: &str = "tmdb";

/// Retry schedule for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay after attempt `n` is `base_delay * 2^n`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay before the attempt following `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Result of [`TrailerDownloader::ensure_trailer`].
#[derive(Debug)]
pub enum EnsureOutcome {
    /// A trailer was fetched and written next to the movie.
    Downloaded(TrailerDescriptor),
    /// The movie already has a trailer.
    Skipped,
    /// No trailer could be obtained.
    Failed(Error),
}

/// Downloader settings captured at construction.
#[derive(Debug, Clone)]
struct DownloadSettings {
    program: PathBuf,
    quality: TrailerQuality,
    max_duration_secs: u32,
    timeout: Duration,
}

/// Fetches missing trailers with yt-dlp.
pub struct TrailerDownloader {
    metadata: Arc<dyn MetadataApiClient>,
    runner: Arc<dyn ProcessRunner>,
    settings: DownloadSettings,
    retry: RetryPolicy,
}

impl TrailerDownloader {
    pub fn new(
        config: &DownloadConfig,
        metadata: Arc<dyn MetadataApiClient>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            metadata,
            runner,
            settings: DownloadSettings {
                program: config.downloader_path.clone(),
                quality: TrailerQuality::from_config(&config.quality),
                max_duration_secs: config.max_duration_secs,
                timeout: config.timeout(),
            },
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Make sure `movie` has a trailer, downloading one if necessary.
    pub async fn ensure_trailer(&self, movie: &MovieRef, cancel: &CancellationToken) -> EnsureOutcome {
        if trailers::has_trailer(movie) {
            tracing::debug!(movie = %movie.name, "Trailer already present, skipping download");
            return EnsureOutcome::Skipped;
        }

        let Some(external_id) = movie.provider_id(EXTERNAL_ID_PROVIDER) else {
            return EnsureOutcome::Failed(Error::unresolvable("missing external identifier"));
        };

        let mut attempt = 1;
        loop {
            if cancel.is_cancelled() {
                return EnsureOutcome::Failed(Error::Cancelled);
            }

            let last_error = match self.attempt(movie, external_id, cancel).await {
                Ok(descriptor) => {
                    tracing::info!(
                        movie = %movie.name,
                        attempt,
                        path = %descriptor.path,
                        "Downloaded trailer"
                    );
                    return EnsureOutcome::Downloaded(descriptor);
                }
                Err(e) => e,
            };

            if !last_error.is_retryable() || attempt >= self.retry.max_attempts {
                tracing::debug!(movie = %movie.name, attempt, error = %last_error, "Giving up on trailer download");
                return EnsureOutcome::Failed(last_error);
            }

            let delay = self.retry.delay_after(attempt);
            tracing::warn!(
                movie = %movie.name,
                attempt,
                delay_secs = delay.as_secs(),
                error = %last_error,
                "Trailer download failed, retrying"
            );

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => return EnsureOutcome::Failed(Error::Cancelled),
            }
            attempt += 1;
        }
    }

    async fn attempt(
        &self,
        movie: &MovieRef,
        external_id: &str,
        cancel: &CancellationToken,
    ) -> Result<TrailerDescriptor> {
        let videos = self.metadata.movie_videos(external_id).await?;
        let url = select_trailer_url(&videos)
            .ok_or_else(|| Error::unresolvable("no trailer URL available"))?;

        let request = YtDlpRequest::for_movie(
            &movie.path,
            url.clone(),
            self.settings.quality,
            self.settings.max_duration_secs,
        );
        let command = ProcessCommand {
            program: self.settings.program.clone(),
            args: request.args(),
            timeout: self.settings.timeout,
        };

        let output = self.runner.run(&command, cancel).await?;
        if !output.success() {
            let stderr = output.stderr.trim();
            let message = if stderr.is_empty() {
                format!("exited with code {:?}", output.exit_code)
            } else {
                stderr.to_string()
            };
            return Err(Error::downloader(DownloaderErrorKind::NonZeroExit, message));
        }

        Ok(downloaded_descriptor(movie, &url))
    }
}

fn downloaded_descriptor(movie: &MovieRef, url: &str) -> TrailerDescriptor {
    let path = find_movie_trailer(&movie.path).unwrap_or_else(|| {
        tracing::error!(
            movie = %movie.name,
            dir = %movie.path.parent().map(|p| p.display().to_string()).unwrap_or_default(),
            "Downloader exited successfully but no trailer file was written"
        );
        let dir = movie.path.parent().map(PathBuf::from).unwrap_or_default();
        dir.join(trailer_stem(&movie.path))
    });

    TrailerDescriptor {
        id: TrailerId::from_path(&path).to_string(),
        name: trailer_stem(&movie.path),
        path: path.to_string_lossy().to_string(),
        runtime_seconds: None,
        origin: TrailerOrigin::Downloaded,
        source: trailers::source_label(url),
    }
}
