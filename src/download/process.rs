//! Running external commands with a timeout and cooperative cancellation.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use trailerforged_common::{DownloaderErrorKind, Error, Result};

/// A fully described external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub timeout: Duration,
}

/// Output captured from a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Spawns external commands.
///
/// A non-zero exit is returned as `Ok` so callers can decide whether it is
/// worth retrying. `Err` is reserved for a missing executable
/// ([`DownloaderErrorKind::ExecutableMissing`]), a timeout
/// ([`DownloaderErrorKind::Timeout`]), spawn failures, and
/// [`Error::Cancelled`].
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: &ProcessCommand, cancel: &CancellationToken) -> Result<ProcessOutput>;
}

/// [`ProcessRunner`] backed by `tokio::process`.
///
/// The child is spawned with `kill_on_drop`, so losing the race against the
/// timeout or the cancellation token kills it.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: &ProcessCommand, cancel: &CancellationToken) -> Result<ProcessOutput> {
        let program = resolve_program(&command.program)?;
        let program_name = program_name(&program);

        tracing::debug!(program = %program.display(), args = ?command.args, "Spawning process");

        let child = Command::new(&program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::downloader(DownloaderErrorKind::ExecutableMissing, program_name.clone())
                } else {
                    Error::downloader(
                        DownloaderErrorKind::Spawn,
                        format!("{program_name}: failed to spawn: {e}"),
                    )
                }
            })?;

        tokio::select! {
            result = child.wait_with_output() => {
                let output = result.map_err(|e| {
                    Error::downloader(
                        DownloaderErrorKind::Spawn,
                        format!("{program_name}: I/O error waiting for process: {e}"),
                    )
                })?;
                Ok(ProcessOutput {
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                })
            }
            _ = tokio::time::sleep(command.timeout) => {
                tracing::warn!(program = %program_name, timeout = ?command.timeout, "Process timed out, killed");
                Err(Error::downloader(
                    DownloaderErrorKind::Timeout,
                    format!("{program_name} timed out after {:?}", command.timeout),
                ))
            }
            _ = cancel.cancelled() => {
                tracing::info!(program = %program_name, "Process cancelled, killed");
                Err(Error::Cancelled)
            }
        }
    }
}

/// Resolve a configured program to an executable path.
///
/// Paths with a directory component must exist; bare names are looked up on
/// `PATH`.
pub fn resolve_program(program: &Path) -> Result<PathBuf> {
    let is_bare_name = program.components().count() == 1 && !program.is_absolute();
    if is_bare_name {
        return which::which(program).map_err(|_| {
            Error::downloader(
                DownloaderErrorKind::ExecutableMissing,
                program.display().to_string(),
            )
        });
    }

    if program.is_file() {
        Ok(program.to_path_buf())
    } else {
        Err(Error::downloader(
            DownloaderErrorKind::ExecutableMissing,
            program.display().to_string(),
        ))
    }
}

fn program_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| program.to_string_lossy().to_string())
}
