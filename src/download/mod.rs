//! On-demand trailer downloads via an external downloader.

mod orchestrator;
mod process;
mod tools;
mod ytdlp;

#[cfg(test)]
pub(crate) mod testing;

pub use orchestrator::{EnsureOutcome, RetryPolicy, TrailerDownloader, EXTERNAL_ID_PROVIDER};
pub use process::{resolve_program, ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use tools::{check_downloader, ToolInfo};
pub use ytdlp::{output_template, TrailerQuality, YtDlpRequest};
