use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub downloads: DownloadConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8787
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Settings consumed by the hover preview client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreviewConfig {
    /// Show trailer previews when hovering a movie card
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Hover time before the preview starts, in milliseconds (0-10000)
    #[serde(default = "default_hover_delay")]
    pub hover_delay_ms: u32,

    /// Preview width in pixels (160-3840)
    #[serde(default = "default_preview_width")]
    pub width: u32,

    /// Preview height in pixels (90-2160)
    #[serde(default = "default_preview_height")]
    pub height: u32,

    /// Start previews muted
    #[serde(default = "default_true")]
    pub muted: bool,
}

fn default_true() -> bool {
    true
}
fn default_hover_delay() -> u32 {
    1000
}
fn default_preview_width() -> u32 {
    480
}
fn default_preview_height() -> u32 {
    270
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hover_delay_ms: default_hover_delay(),
            width: default_preview_width(),
            height: default_preview_height(),
            muted: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadConfig {
    /// Download missing trailers during library scans
    #[serde(default)]
    pub enabled: bool,

    /// Maximum trailer resolution: 480p, 720p, 1080p, 1440p or 2160p
    #[serde(default = "default_quality")]
    pub quality: String,

    /// Trim downloads to this many seconds (0 = unlimited, max 3600)
    #[serde(default)]
    pub max_duration_secs: u32,

    /// Maximum concurrent downloads (1-10)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: u32,

    /// Hours between scheduled scans (1-8760)
    #[serde(default = "default_scan_interval")]
    pub scan_interval_hours: u32,

    /// Downloader executable, looked up on PATH when not absolute
    #[serde(default = "default_downloader")]
    pub downloader_path: PathBuf,

    /// Per-invocation downloader timeout in seconds
    #[serde(default = "default_download_timeout")]
    pub timeout_secs: u64,
}

fn default_quality() -> String {
    "720p".to_string()
}
fn default_max_concurrent() -> u32 {
    1
}
fn default_scan_interval() -> u32 {
    24
}
fn default_downloader() -> PathBuf {
    PathBuf::from("yt-dlp")
}
fn default_download_timeout() -> u64 {
    600
}

impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.scan_interval_hours) * 3600)
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            quality: default_quality(),
            max_duration_secs: 0,
            max_concurrent: default_max_concurrent(),
            scan_interval_hours: default_scan_interval(),
            downloader_path: default_downloader(),
            timeout_secs: default_download_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_tmdb_url")]
    pub base_url: String,
}

fn default_language() -> String {
    "en-US".to_string()
}
fn default_tmdb_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: default_language(),
            base_url: default_tmdb_url(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Movie directories scanned by the filesystem catalog
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}
