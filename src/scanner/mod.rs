//! Library-wide trailer scan.
//!
//! The scanner is the only component that walks the whole library. It takes
//! a single snapshot of the movie list, asks the downloader to ensure a
//! trailer for each movie in order, and folds the outcomes into a
//! [`ScanResult`]. One movie's failure (including a panic) is recorded and
//! never stops the run.

mod service;

pub use service::{ScanService, ScanStatus};

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use trailerforged_common::{Error, Result};

use crate::config::{validate_config, Config};
use crate::download::{EnsureOutcome, TrailerDownloader};
use crate::library::LibraryCatalog;

/// Number of error messages echoed in the scan summary log.
const SUMMARY_ERROR_LIMIT: usize = 5;

/// Receives fractional progress (`processed / total`) after every movie.
pub trait ScanProgress: Send + Sync {
    fn report(&self, fraction: f64);
}

impl<F> ScanProgress for F
where
    F: Fn(f64) + Send + Sync,
{
    fn report(&self, fraction: f64) {
        self(fraction)
    }
}

/// Progress sink that discards updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ScanProgress for NoProgress {
    fn report(&self, _fraction: f64) {}
}

/// A per-movie failure recorded during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanError {
    pub movie: String,
    pub message: String,
}

/// Aggregated outcome of one scan run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub processed: usize,
    pub downloaded: usize,
    /// At most one entry per movie, in processing order.
    pub errors: Vec<ScanError>,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScanResult {
    fn started() -> Self {
        let now = Utc::now();
        Self {
            processed: 0,
            downloaded: 0,
            errors: Vec::new(),
            cancelled: false,
            started_at: now,
            finished_at: now,
        }
    }
}

/// Runs trailer scans over the whole library.
pub struct LibraryScanner {
    config: Arc<Config>,
    catalog: Arc<dyn LibraryCatalog>,
    downloader: Arc<TrailerDownloader>,
}

impl LibraryScanner {
    pub fn new(
        config: Arc<Config>,
        catalog: Arc<dyn LibraryCatalog>,
        downloader: Arc<TrailerDownloader>,
    ) -> Self {
        Self {
            config,
            catalog,
            downloader,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check that a scan may run at all.
    pub fn preflight(&self) -> Result<()> {
        if !self.config.downloads.enabled {
            return Err(Error::configuration("trailer downloads are disabled"));
        }
        validate_config(&self.config)
    }

    /// Run one scan.
    ///
    /// Fails before touching any movie when downloads are disabled, the
    /// configuration is invalid, or the movie list cannot be fetched.
    /// Cancellation is checked before each movie; movies already processed
    /// keep their results.
    pub async fn run_scan(
        &self,
        progress: &dyn ScanProgress,
        cancel: &CancellationToken,
    ) -> Result<ScanResult> {
        self.preflight()?;

        let movies = self.catalog.list_movies().await?;
        let total = movies.len();
        let mut result = ScanResult::started();

        info!(movies = total, "Starting trailer scan");

        for movie in &movies {
            if cancel.is_cancelled() {
                result.cancelled = true;
                break;
            }

            let outcome = AssertUnwindSafe(self.downloader.ensure_trailer(movie, cancel))
                .catch_unwind()
                .await;
            result.processed += 1;

            match outcome {
                Ok(EnsureOutcome::Downloaded(_)) => result.downloaded += 1,
                Ok(EnsureOutcome::Skipped) => {}
                Ok(EnsureOutcome::Failed(Error::Cancelled)) => {
                    debug!(movie = %movie.name, "Download cancelled");
                    result.cancelled = true;
                }
                Ok(EnsureOutcome::Failed(e)) => {
                    debug!(movie = %movie.name, error = %e, "Trailer download failed");
                    result.errors.push(ScanError {
                        movie: movie.name.clone(),
                        message: e.to_string(),
                    });
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    warn!(movie = %movie.name, error = %message, "Unexpected error while processing movie");
                    result.errors.push(ScanError {
                        movie: movie.name.clone(),
                        message,
                    });
                }
            }

            progress.report(result.processed as f64 / total as f64);

            if result.cancelled {
                break;
            }
        }

        if total == 0 {
            progress.report(1.0);
        }

        result.finished_at = Utc::now();
        log_summary(&result);
        Ok(result)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("unexpected error: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("unexpected error: {s}")
    } else {
        "unexpected error".to_string()
    }
}

fn log_summary(result: &ScanResult) {
    info!(
        processed = result.processed,
        downloaded = result.downloaded,
        errors = result.errors.len(),
        cancelled = result.cancelled,
        "Trailer scan finished"
    );
    for error in result.errors.iter().take(SUMMARY_ERROR_LIMIT) {
        warn!(movie = %error.movie, "{}", error.message);
    }
    if result.errors.len() > SUMMARY_ERROR_LIMIT {
        warn!(
            "... and {} more errors",
            result.errors.len() - SUMMARY_ERROR_LIMIT
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::testing::{movie_with_tmdb, FakeMetadata, FakeRunner};
    use crate::library::InMemoryCatalog;
    use assert_matches::assert_matches;
    use parking_lot::Mutex;
    use std::path::PathBuf;
    use trailerforged_common::{LocalTrailer, MovieRef};

    fn enabled_config() -> Config {
        let mut config = Config::default();
        config.downloads.enabled = true;
        config.tmdb.api_key = "key".into();
        config
    }

    fn scanner(
        config: Config,
        movies: Vec<MovieRef>,
        metadata: FakeMetadata,
        runner: FakeRunner,
    ) -> LibraryScanner {
        let config = Arc::new(config);
        let downloader = TrailerDownloader::new(
            &config.downloads,
            Arc::new(metadata),
            Arc::new(runner),
        );
        LibraryScanner::new(
            config,
            Arc::new(InMemoryCatalog::new(movies)),
            Arc::new(downloader),
        )
    }

    #[tokio::test]
    async fn disabled_downloads_fail_fast() {
        let s = scanner(
            Config::default(),
            vec![movie_with_tmdb("Heat", "949")],
            FakeMetadata::with_trailer("x"),
            FakeRunner::succeeding(),
        );
        let result = s.run_scan(&NoProgress, &CancellationToken::new()).await;
        assert_matches!(result, Err(Error::Configuration(_)));
    }

    #[tokio::test]
    async fn invalid_config_fails_fast() {
        let mut config = enabled_config();
        config.downloads.max_concurrent = 11;
        let runner = FakeRunner::succeeding();
        let s = scanner(config, vec![movie_with_tmdb("Heat", "949")], FakeMetadata::with_trailer("x"), runner);
        let result = s.run_scan(&NoProgress, &CancellationToken::new()).await;
        assert_matches!(result, Err(Error::Configuration(msg)) if msg.contains("max_concurrent"));
    }

    #[tokio::test]
    async fn counts_downloads_skips_and_failures() {
        let mut with_local = movie_with_tmdb("Alien", "348");
        with_local
            .local_trailers
            .push(LocalTrailer::from_path(PathBuf::from("/movies/Alien/Alien-trailer.mkv")));
        let mut no_id = movie_with_tmdb("Unknown", "1");
        no_id.provider_ids.clear();

        let movies = vec![movie_with_tmdb("Heat", "949"), with_local, no_id];
        let progress = Mutex::new(Vec::new());
        let sink = |p: f64| progress.lock().push(p);

        let s = scanner(enabled_config(), movies, FakeMetadata::with_trailer("x"), FakeRunner::succeeding());
        let result = s.run_scan(&sink, &CancellationToken::new()).await.unwrap();

        assert_eq!(result.processed, 3);
        assert_eq!(result.downloaded, 1);
        assert_eq!(
            result.errors,
            vec![ScanError {
                movie: "Unknown".into(),
                message: "missing external identifier".into(),
            }]
        );
        assert!(!result.cancelled);
        assert_eq!(progress.lock().as_slice(), &[1.0 / 3.0, 2.0 / 3.0, 1.0]);
    }

    #[tokio::test]
    async fn panic_in_one_movie_does_not_stop_the_run() {
        let movies = vec![
            movie_with_tmdb("First", "1"),
            movie_with_tmdb("Broken", "2"),
            movie_with_tmdb("Third", "3"),
            movie_with_tmdb("Fourth", "4"),
        ];
        let metadata = FakeMetadata::with_trailer("x").panicking_for("2");

        let s = scanner(enabled_config(), movies, metadata, FakeRunner::succeeding());
        let result = s.run_scan(&NoProgress, &CancellationToken::new()).await.unwrap();

        assert_eq!(result.processed, 4);
        assert_eq!(result.downloaded, 3);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].movie, "Broken");
        assert!(result.errors[0].message.contains("metadata lookup exploded"));
    }

    #[tokio::test]
    async fn cancellation_stops_iteration() {
        let movies: Vec<MovieRef> = (0..10)
            .map(|i| movie_with_tmdb(&format!("Movie {i}"), &i.to_string()))
            .collect();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let sink = move |p: f64| {
            if p >= 0.3 {
                trigger.cancel();
            }
        };

        let s = scanner(enabled_config(), movies, FakeMetadata::with_trailer("x"), FakeRunner::succeeding());
        let result = s.run_scan(&sink, &cancel).await.unwrap();

        assert!(result.cancelled);
        assert_eq!(result.processed, 3);
        assert_eq!(result.downloaded, 3);
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn cancelled_before_start_processes_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let s = scanner(
            enabled_config(),
            vec![movie_with_tmdb("Heat", "949")],
            FakeMetadata::with_trailer("x"),
            FakeRunner::succeeding(),
        );
        let result = s.run_scan(&NoProgress, &cancel).await.unwrap();
        assert_eq!(result.processed, 0);
        assert!(result.cancelled);
    }

    #[tokio::test]
    async fn empty_library_reports_completion() {
        let progress = Mutex::new(Vec::new());
        let sink = |p: f64| progress.lock().push(p);
        let s = scanner(enabled_config(), vec![], FakeMetadata::with_trailer("x"), FakeRunner::succeeding());
        let result = s.run_scan(&sink, &CancellationToken::new()).await.unwrap();
        assert_eq!(result.processed, 0);
        assert_eq!(progress.lock().as_slice(), &[1.0]);
    }
}
