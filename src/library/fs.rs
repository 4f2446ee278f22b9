//! Filesystem-backed library catalog.
//!
//! Walks the configured movie directories and builds a [`MovieRef`] for every
//! video file that is not itself a trailer or sample. Movie ids are derived
//! from the file path so they stay stable between walks.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use trailerforged_common::paths::{is_sample_file, is_trailer_file, is_video_file, trailer_stem, TRAILERS_DIR};
use trailerforged_common::{Error, LocalTrailer, MovieId, MovieRef, RemoteTrailer, Result};

use super::nfo::{parse_nfo, tmdb_id_from_name, NfoInfo};
use super::LibraryCatalog;

/// Catalog that reads movies straight from disk.
#[derive(Debug, Clone)]
pub struct FsCatalog {
    roots: Vec<PathBuf>,
}

impl FsCatalog {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    async fn walk(&self) -> Result<Vec<MovieRef>> {
        let roots = self.roots.clone();
        tokio::task::spawn_blocking(move || walk_roots(&roots))
            .await
            .map_err(|e| Error::internal(format!("library walk task failed: {e}")))
    }
}

#[async_trait]
impl LibraryCatalog for FsCatalog {
    async fn list_movies(&self) -> Result<Vec<MovieRef>> {
        self.walk().await
    }

    async fn get_movie(&self, id: MovieId) -> Result<Option<MovieRef>> {
        Ok(self.walk().await?.into_iter().find(|m| m.id == id))
    }
}

fn walk_roots(roots: &[PathBuf]) -> Vec<MovieRef> {
    let mut movie_files: Vec<PathBuf> = Vec::new();

    for root in roots {
        if !root.exists() {
            tracing::warn!(path = %root.display(), "Library path does not exist, skipping");
            continue;
        }

        for entry in walkdir::WalkDir::new(root).follow_links(true) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable library entry");
                    continue;
                }
            };
            let path = entry.path();
            if entry.file_type().is_file()
                && is_video_file(path)
                && !is_trailer_file(path)
                && !is_sample_file(path)
            {
                movie_files.push(path.to_path_buf());
            }
        }
    }

    movie_files.sort();
    movie_files.dedup();

    let movies: Vec<MovieRef> = movie_files.iter().map(|p| build_movie(p)).collect();
    tracing::debug!(count = movies.len(), "Walked movie library");
    movies
}

fn build_movie(path: &Path) -> MovieRef {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut movie = MovieRef::new(MovieId::from_path(path), display_name(&stem), path);

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    movie.local_trailers = local_trailers(dir, path);

    let nfo = read_nfo(dir, &stem);
    for url in nfo.trailer_urls {
        movie.remote_trailers.push(RemoteTrailer { name: None, url });
    }

    let folder_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmdb_id = tmdb_id_from_name(&stem)
        .or_else(|| tmdb_id_from_name(&folder_name))
        .or(nfo.tmdb_id);
    if let Some(id) = tmdb_id {
        movie.provider_ids.insert("tmdb".to_string(), id);
    }

    movie
}

/// Strip `[...]` / `{...}` tags from a file stem.
fn display_name(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut depth = 0usize;
    for c in stem.chars() {
        match c {
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    let trimmed = out.split_whitespace().collect::<Vec<_>>().join(" ");
    if trimmed.is_empty() {
        stem.to_string()
    } else {
        trimmed
    }
}

fn local_trailers(dir: &Path, movie_path: &Path) -> Vec<LocalTrailer> {
    let own_stem = trailer_stem(movie_path).to_lowercase();
    let mut found: Vec<PathBuf> = list_videos(dir)
        .into_iter()
        .filter(|p| {
            let stem = p
                .file_stem()
                .map(|s| s.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            stem == own_stem || stem == "trailer"
        })
        .collect();

    let mut extras = list_videos(&dir.join(TRAILERS_DIR));
    extras.sort();
    found.sort();
    found.extend(extras);

    found.into_iter().map(LocalTrailer::from_path).collect()
}

fn list_videos(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_video_file(p))
        .collect()
}

fn read_nfo(dir: &Path, stem: &str) -> NfoInfo {
    let candidates = [dir.join(format!("{stem}.nfo")), dir.join("movie.nfo")];
    for candidate in candidates {
        match std::fs::read_to_string(&candidate) {
            Ok(content) => return parse_nfo(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %candidate.display(), error = %e, "Failed to read nfo");
            }
        }
    }
    NfoInfo::default()
}
