//! Path utilities for recognizing videos and trailers by name.
//!
//! Trailer naming follows the usual media-server conventions:
//! `<movie>-trailer.<ext>`, a bare `trailer.<ext>`, or any video inside a
//! `trailers/` directory.

use std::path::{Path, PathBuf};

/// List of supported video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "webm", "mov", "wmv", "flv",
];

/// Suffix appended to a movie's file stem for its trailer.
pub const TRAILER_SUFFIX: &str = "-trailer";

/// Name of the per-movie directory holding extra trailers.
pub const TRAILERS_DIR: &str = "trailers";

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use trailerforged_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("movie.mkv")));
/// assert!(is_video_file(Path::new("/path/to/video.MP4")));
/// assert!(!is_video_file(Path::new("movie.nfo")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check if a video path names a trailer.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use trailerforged_common::paths::is_trailer_file;
///
/// assert!(is_trailer_file(Path::new("/m/Alien-trailer.mkv")));
/// assert!(is_trailer_file(Path::new("/m/trailer.mp4")));
/// assert!(is_trailer_file(Path::new("/m/trailers/teaser.mp4")));
/// assert!(!is_trailer_file(Path::new("/m/Alien.mkv")));
/// ```
pub fn is_trailer_file(path: &Path) -> bool {
    if !is_video_file(path) {
        return false;
    }

    let stem = file_stem_lower(path);
    if stem == "trailer" || stem.ends_with(TRAILER_SUFFIX) {
        return true;
    }

    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().eq_ignore_ascii_case(TRAILERS_DIR))
        .unwrap_or(false)
}

/// Check if a video path names a sample clip.
pub fn is_sample_file(path: &Path) -> bool {
    let stem = file_stem_lower(path);
    stem == "sample" || stem.ends_with("-sample") || stem.ends_with(".sample")
}

/// Stem used for a movie's trailer file, e.g. `Alien (1979)-trailer`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use trailerforged_common::paths::trailer_stem;
///
/// assert_eq!(trailer_stem(Path::new("/m/Alien (1979).mkv")), "Alien (1979)-trailer");
/// ```
pub fn trailer_stem(movie_path: &Path) -> String {
    let stem = movie_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{stem}{TRAILER_SUFFIX}")
}

/// Find the trailer file written next to a movie, if any.
///
/// Returns the first video file (by name order) whose stem equals
/// [`trailer_stem`] for `movie_path`.
pub fn find_movie_trailer(movie_path: &Path) -> Option<PathBuf> {
    let dir = movie_path.parent()?;
    let wanted = trailer_stem(movie_path);

    let mut matches: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_video_file(p))
        .filter(|p| {
            p.file_stem()
                .map(|s| s.to_string_lossy() == wanted)
                .unwrap_or(false)
        })
        .collect();
    matches.sort();
    matches.into_iter().next()
}

fn file_stem_lower(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
