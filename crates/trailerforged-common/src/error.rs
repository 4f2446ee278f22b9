//! Error taxonomy shared by every trailerforged component.
//!
//! The split that matters most is transient versus terminal: the download
//! orchestrator retries only errors for which [`Error::is_retryable`] returns
//! `true`. API handlers derive their status code and machine-readable code
//! from [`Error::http_status`] and [`Error::code`].

use std::fmt;

/// Why an external downloader invocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloaderErrorKind {
    /// The downloader executable could not be found.
    ExecutableMissing,
    /// The process ran past its execution timeout and was killed.
    Timeout,
    /// The process exited with a non-zero status.
    NonZeroExit,
    /// The process could not be spawned or awaited for another reason.
    Spawn,
}

impl fmt::Display for DownloaderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutableMissing => write!(f, "executable missing"),
            Self::Timeout => write!(f, "timed out"),
            Self::NonZeroExit => write!(f, "non-zero exit"),
            Self::Spawn => write!(f, "spawn failed"),
        }
    }
}

/// Common error type for trailerforged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Settings are out of range or inconsistent. Aborts before side effects.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed request input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The requested movie does not exist in the library.
    #[error("movie not found")]
    MovieNotFound,

    /// The movie exists but has no local or remote trailer.
    #[error("no trailer found")]
    TrailerNotFound,

    /// The external metadata service failed (non-2xx, bad JSON, network, timeout).
    #[error("External service error: {message}")]
    ExternalService {
        /// Human-readable error description.
        message: String,
        /// Whether a later attempt may succeed.
        retryable: bool,
    },

    /// The external downloader failed.
    #[error("Downloader error ({kind}): {message}")]
    Downloader {
        /// What went wrong.
        kind: DownloaderErrorKind,
        /// Process error output or spawn failure detail.
        message: String,
    },

    /// No source can be determined for a trailer download.
    #[error("{0}")]
    TrailerUnresolvable(String),

    /// An operation was already running and another was refused.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The operation was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for [`Error::Configuration`].
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Convenience constructor for [`Error::InvalidInput`].
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// A retryable [`Error::ExternalService`].
    pub fn external<S: Into<String>>(msg: S) -> Self {
        Self::ExternalService {
            message: msg.into(),
            retryable: true,
        }
    }

    /// Convenience constructor for [`Error::Downloader`].
    pub fn downloader<S: Into<String>>(kind: DownloaderErrorKind, msg: S) -> Self {
        Self::Downloader {
            kind,
            message: msg.into(),
        }
    }

    /// Convenience constructor for [`Error::TrailerUnresolvable`].
    pub fn unresolvable<S: Into<String>>(msg: S) -> Self {
        Self::TrailerUnresolvable(msg.into())
    }

    /// Convenience constructor for [`Error::Internal`].
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether retrying the same operation might succeed.
    ///
    /// Network failures and downloader non-zero exits are transient. Missing
    /// identifiers, missing candidate URLs, a missing executable, and process
    /// timeouts are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::ExternalService { retryable, .. } => *retryable,
            Error::Downloader { kind, .. } => *kind == DownloaderErrorKind::NonZeroExit,
            _ => false,
        }
    }

    /// Map this error to an HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Configuration(_) => 400,
            Error::InvalidInput(_) => 400,
            Error::MovieNotFound => 404,
            Error::TrailerNotFound => 404,
            Error::Conflict(_) => 409,
            _ => 500,
        }
    }

    /// Machine-readable error code carried in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "CONFIGURATION_ERROR",
            Error::InvalidInput(_) => "INVALID_ARGUMENT",
            Error::MovieNotFound => "MOVIE_NOT_FOUND",
            Error::TrailerNotFound => "TRAILER_NOT_FOUND",
            Error::Conflict(_) => "SCAN_IN_PROGRESS",
            _ => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
