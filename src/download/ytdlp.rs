//! yt-dlp invocation arguments.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use trailerforged_common::paths::trailer_stem;

/// Maximum trailer resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailerQuality {
    P480,
    #[default]
    P720,
    P1080,
    P1440,
    P2160,
}

/// Quality names and the maximum frame height they allow.
const QUALITY_TABLE: &[(&str, TrailerQuality, u32)] = &[
    ("480p", TrailerQuality::P480, 480),
    ("720p", TrailerQuality::P720, 720),
    ("1080p", TrailerQuality::P1080, 1080),
    ("1440p", TrailerQuality::P1440, 1440),
    ("2160p", TrailerQuality::P2160, 2160),
];

impl TrailerQuality {
    /// Parse a configured quality, falling back to 720p when unrecognized.
    pub fn from_config(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub fn max_height(self) -> u32 {
        QUALITY_TABLE
            .iter()
            .find(|(_, q, _)| *q == self)
            .map(|(_, _, h)| *h)
            .unwrap_or(720)
    }

    /// yt-dlp format filter for "best at or below this height".
    pub fn format_filter(self) -> String {
        let h = self.max_height();
        format!("bestvideo[height<={h}]+bestaudio/best[height<={h}]")
    }
}

impl FromStr for TrailerQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        QUALITY_TABLE
            .iter()
            .find(|(name, _, _)| *name == wanted)
            .map(|(_, q, _)| *q)
            .ok_or_else(|| format!("Unknown trailer quality: {}", s))
    }
}

impl fmt::Display for TrailerQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.max_height())
    }
}

/// One yt-dlp download of a trailer next to its movie.
#[derive(Debug, Clone)]
pub struct YtDlpRequest {
    pub url: String,
    /// Output template, e.g. `/movies/Heat/Heat-trailer.%(ext)s`.
    pub output: PathBuf,
    pub quality: TrailerQuality,
    /// Trim to this many seconds; 0 keeps the full video.
    pub max_duration_secs: u32,
}

impl YtDlpRequest {
    pub fn for_movie(
        movie_path: &Path,
        url: impl Into<String>,
        quality: TrailerQuality,
        max_duration_secs: u32,
    ) -> Self {
        Self {
            url: url.into(),
            output: output_template(movie_path),
            quality,
            max_duration_secs,
        }
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--format".to_string(),
            self.quality.format_filter(),
            "--output".to_string(),
            self.output.to_string_lossy().to_string(),
            "--no-playlist".to_string(),
            "--no-check-certificate".to_string(),
            "--socket-timeout".to_string(),
            "30".to_string(),
        ];
        if self.max_duration_secs > 0 {
            args.push("--postprocessor-args".to_string());
            args.push(format!("ffmpeg:-t {}", self.max_duration_secs));
        }
        args.push(self.url.clone());
        args
    }
}

/// `{movie dir}/{movie stem}-trailer.%(ext)s`
pub fn output_template(movie_path: &Path) -> PathBuf {
    let dir = movie_path.parent().unwrap_or_else(|| Path::new("."));
    dir.join(format!("{}.%(ext)s", trailer_stem(movie_path)))
}
