mod types;

pub use types::*;

use crate::download::TrailerQuality;
use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./trailerforged.toml",
        "~/.config/trailerforged/config.toml",
        "/etc/trailerforged/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration, refusing out-of-range values instead of clamping.
pub fn validate_config(config: &Config) -> trailerforged_common::Result<()> {
    let problems = config.problems();
    if problems.is_empty() {
        return Ok(());
    }
    Err(trailerforged_common::Error::configuration(problems.join("; ")))
}

impl Config {
    /// Every out-of-range or inconsistent setting, in declaration order.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.server.port == 0 {
            problems.push("server.port cannot be 0".to_string());
        }

        let preview = &self.preview;
        if preview.hover_delay_ms > 10_000 {
            problems.push(format!(
                "preview.hover_delay_ms must be within 0-10000, got {}",
                preview.hover_delay_ms
            ));
        }
        if !(160..=3840).contains(&preview.width) {
            problems.push(format!(
                "preview.width must be within 160-3840, got {}",
                preview.width
            ));
        }
        if !(90..=2160).contains(&preview.height) {
            problems.push(format!(
                "preview.height must be within 90-2160, got {}",
                preview.height
            ));
        }

        let downloads = &self.downloads;
        if downloads.quality.parse::<TrailerQuality>().is_err() {
            problems.push(format!(
                "downloads.quality must be one of 480p, 720p, 1080p, 1440p, 2160p, got '{}'",
                downloads.quality
            ));
        }
        if downloads.max_duration_secs > 3600 {
            problems.push(format!(
                "downloads.max_duration_secs must be 0 (unlimited) or within 1-3600, got {}",
                downloads.max_duration_secs
            ));
        }
        if !(1..=10).contains(&downloads.max_concurrent) {
            problems.push(format!(
                "downloads.max_concurrent must be within 1-10, got {}",
                downloads.max_concurrent
            ));
        }
        if !(1..=8760).contains(&downloads.scan_interval_hours) {
            problems.push(format!(
                "downloads.scan_interval_hours must be within 1-8760, got {}",
                downloads.scan_interval_hours
            ));
        }
        if downloads.timeout_secs == 0 {
            problems.push("downloads.timeout_secs must be greater than 0".to_string());
        }
        if downloads.downloader_path.as_os_str().is_empty() {
            problems.push("downloads.downloader_path cannot be empty".to_string());
        }
        if downloads.enabled && self.tmdb.api_key.trim().is_empty() {
            problems.push("downloads are enabled but tmdb.api_key is empty".to_string());
        }

        problems
    }
}
