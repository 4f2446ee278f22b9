//! Downloader availability checks.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::process::resolve_program;

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub available: bool,
    /// First line of `--version` output.
    pub version: Option<String>,
    pub path: Option<PathBuf>,
}

/// Locate the configured downloader and ask it for its version.
pub fn check_downloader(program: &Path) -> ToolInfo {
    let name = program.display().to_string();
    let Ok(path) = resolve_program(program) else {
        return ToolInfo {
            name,
            available: false,
            version: None,
            path: None,
        };
    };

    match Command::new(&path).arg("--version").output() {
        Ok(output) if output.status.success() => ToolInfo {
            name,
            available: true,
            version: String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.trim().to_string()),
            path: Some(path),
        },
        _ => ToolInfo {
            name,
            available: false,
            version: None,
            path: Some(path),
        },
    }
}
