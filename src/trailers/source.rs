//! Human-readable source labels for remote trailer URLs.

use reqwest::Url;

/// Label used for every local trailer file.
pub const LOCAL_FILE_LABEL: &str = "Local File";

/// Label used when a remote URL cannot be parsed.
pub const EXTERNAL_LABEL: &str = "External";

/// Host substrings and the label they map to. First match wins.
const HOST_LABELS: &[(&str, &str)] = &[
    ("youtube.com", "YouTube"),
    ("youtu.be", "YouTube"),
    ("vimeo.com", "Vimeo"),
    ("dailymotion.com", "Dailymotion"),
    ("twitch.tv", "Twitch"),
    ("facebook.com", "Facebook"),
    ("instagram.com", "Instagram"),
    ("tiktok.com", "TikTok"),
];

/// Derive a source label from a trailer URL's host.
///
/// Known platforms get their display name, other hosts are returned
/// lowercased, and anything unparseable is labelled [`EXTERNAL_LABEL`].
pub fn source_label(url: &str) -> String {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return EXTERNAL_LABEL.to_string();
    };
    let Some(host) = parsed.host_str().filter(|h| !h.is_empty()) else {
        return EXTERNAL_LABEL.to_string();
    };

    let host = host.to_lowercase();
    HOST_LABELS
        .iter()
        .find(|(needle, _)| host.contains(needle))
        .map(|(_, label)| label.to_string())
        .unwrap_or(host)
}
