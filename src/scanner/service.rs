//! Single-flight scan execution plus the periodic scheduler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use trailerforged_common::{Error, Result};

use super::{LibraryScanner, ScanResult};

/// Snapshot of scan activity exposed over HTTP.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatus {
    pub running: bool,
    /// Fraction of the current (or last) scan completed, 0.0-1.0.
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<ScanResult>,
}

/// Runs at most one scan at a time and remembers the last result.
pub struct ScanService {
    scanner: LibraryScanner,
    running: Arc<AtomicBool>,
    status: Arc<RwLock<ScanStatus>>,
}

/// Clears the running flag when dropped, even if the scan task unwinds.
struct ScanGuard {
    running: Arc<AtomicBool>,
    status: Arc<RwLock<ScanStatus>>,
}

impl Drop for ScanGuard {
    fn drop(&mut self) {
        self.status.write().running = false;
        self.running.store(false, Ordering::Release);
    }
}

impl ScanService {
    pub fn new(scanner: LibraryScanner) -> Self {
        Self {
            scanner,
            running: Arc::new(AtomicBool::new(false)),
            status: Arc::new(RwLock::new(ScanStatus::default())),
        }
    }

    pub fn scanner(&self) -> &LibraryScanner {
        &self.scanner
    }

    pub fn status(&self) -> ScanStatus {
        self.status.read().clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<ScanGuard> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::Conflict("a trailer scan is already running".into()));
        }
        {
            let mut status = self.status.write();
            status.running = true;
            status.progress = 0.0;
        }
        Ok(ScanGuard {
            running: self.running.clone(),
            status: self.status.clone(),
        })
    }

    async fn run_guarded(&self, _guard: ScanGuard, cancel: &CancellationToken) -> Result<ScanResult> {
        let status = self.status.clone();
        let progress = move |fraction: f64| status.write().progress = fraction;

        let result = self.scanner.run_scan(&progress, cancel).await;
        if let Ok(ref scan) = result {
            self.status.write().last_result = Some(scan.clone());
        }
        result
    }

    /// Run a scan on the current task.
    ///
    /// Returns [`Error::Conflict`] when another scan is in flight.
    pub async fn run_now(&self, cancel: &CancellationToken) -> Result<ScanResult> {
        let guard = self.acquire()?;
        self.run_guarded(guard, cancel).await
    }

    /// Start a scan in the background.
    ///
    /// Preflight checks and the single-flight check happen before spawning,
    /// so callers learn about configuration problems and conflicts
    /// synchronously.
    pub fn spawn_scan(self: &Arc<Self>, cancel: CancellationToken) -> Result<JoinHandle<()>> {
        self.scanner.preflight()?;
        let guard = self.acquire()?;
        let service = Arc::clone(self);
        Ok(tokio::spawn(async move {
            if let Err(e) = service.run_guarded(guard, &cancel).await {
                tracing::error!("Trailer scan failed: {e}");
            }
        }))
    }

    /// Run a scan every `interval` until `cancel` fires.
    ///
    /// The first scan happens one interval after startup. A tick that finds
    /// a scan already running is skipped.
    pub async fn run_schedule(self: Arc<Self>, interval: Duration, cancel: CancellationToken) {
        tracing::info!(interval_hours = interval.as_secs() / 3600, "Trailer scan scheduler started");

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = cancel.cancelled() => break,
            }

            match self.run_now(&cancel).await {
                Ok(_) => {}
                Err(Error::Conflict(_)) => {
                    tracing::debug!("Scheduled scan skipped, a scan is already running");
                }
                Err(e) => tracing::warn!("Scheduled trailer scan failed: {e}"),
            }
        }

        tracing::info!("Trailer scan scheduler stopped");
    }
}
