//! Minimal `.nfo` sidecar and file-name tag parsing.
//!
//! Only the fields the trailer workflow needs are extracted: the TMDb id and
//! any `<trailer>` URLs.

use regex::Regex;
use std::sync::OnceLock;

fn tmdb_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)[\[{]tmdb(?:id)?-(\d+)[\]}]").expect("valid tmdb tag regex")
    })
}

fn uniqueid_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<uniqueid[^>]*type\s*=\s*"tmdb"[^>]*>\s*(\d+)\s*</uniqueid>"#)
            .expect("valid uniqueid regex")
    })
}

fn tmdbid_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<tmdbid>\s*(\d+)\s*</tmdbid>").expect("valid tmdbid regex"))
}

fn trailer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<trailer>\s*(.*?)\s*</trailer>").expect("valid trailer regex"))
}

/// TMDb id from a `[tmdbid-123]` or `{tmdb-123}` name tag.
pub fn tmdb_id_from_name(name: &str) -> Option<String> {
    tmdb_tag_re()
        .captures(name)
        .map(|c| c[1].to_string())
}

/// Fields read from an `.nfo` document.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NfoInfo {
    pub tmdb_id: Option<String>,
    pub trailer_urls: Vec<String>,
}

/// Parse the fields of interest out of an `.nfo` document.
///
/// Trailer entries that are not plain http(s) URLs (e.g. Kodi plugin links)
/// are ignored.
pub fn parse_nfo(content: &str) -> NfoInfo {
    let tmdb_id = uniqueid_re()
        .captures(content)
        .or_else(|| tmdbid_re().captures(content))
        .map(|c| c[1].to_string());

    let trailer_urls = trailer_re()
        .captures_iter(content)
        .map(|c| c[1].trim().to_string())
        .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
        .collect();

    NfoInfo {
        tmdb_id,
        trailer_urls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_tags() {
        assert_eq!(tmdb_id_from_name("Heat (1995) [tmdbid-949]"), Some("949".into()));
        assert_eq!(tmdb_id_from_name("Heat (1995) {tmdb-949}"), Some("949".into()));
        assert_eq!(tmdb_id_from_name("Heat (1995) [TMDBID-949]"), Some("949".into()));
        assert_eq!(tmdb_id_from_name("Heat (1995) [imdbid-tt0113277]"), None);
    }

    #[test]
    fn nfo_fields() {
        let nfo = r#"<?xml version="1.0"?>
<movie>
  <title>Heat</title>
  <uniqueid type="imdb">tt0113277</uniqueid>
  <uniqueid type="tmdb" default="true">949</uniqueid>
  <trailer>plugin://plugin.video.youtube/?action=play_video&amp;videoid=abc</trailer>
  <trailer> https://www.youtube.com/watch?v=2GfZl4kuVNI </trailer>
</movie>"#;
        let info = parse_nfo(nfo);
        assert_eq!(info.tmdb_id.as_deref(), Some("949"));
        assert_eq!(
            info.trailer_urls,
            vec!["https://www.youtube.com/watch?v=2GfZl4kuVNI".to_string()]
        );
    }

    #[test]
    fn legacy_tmdbid_element() {
        let info = parse_nfo("<movie><tmdbid>603</tmdbid></movie>");
        assert_eq!(info.tmdb_id.as_deref(), Some("603"));
        assert!(info.trailer_urls.is_empty());
    }
}
