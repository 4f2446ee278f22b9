//! Library catalog abstraction.
//!
//! The core never touches a media server directly. It asks a
//! [`LibraryCatalog`] for movie snapshots and treats them as read-only.

mod fs;
mod nfo;

pub use fs::FsCatalog;

use async_trait::async_trait;
use trailerforged_common::{MovieId, MovieRef, Result};

/// Source of movie snapshots.
///
/// Implementations must be cheap to share across tasks (wrap in `Arc`).
#[async_trait]
pub trait LibraryCatalog: Send + Sync {
    /// Every movie in the library, in a stable order.
    async fn list_movies(&self) -> Result<Vec<MovieRef>>;

    /// Look up a single movie. `Ok(None)` means the movie does not exist.
    async fn get_movie(&self, id: MovieId) -> Result<Option<MovieRef>>;
}

/// A fixed set of movies held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    movies: Vec<MovieRef>,
}

impl InMemoryCatalog {
    pub fn new(movies: Vec<MovieRef>) -> Self {
        Self { movies }
    }
}

#[async_trait]
impl LibraryCatalog for InMemoryCatalog {
    async fn list_movies(&self) -> Result<Vec<MovieRef>> {
        Ok(self.movies.clone())
    }

    async fn get_movie(&self, id: MovieId) -> Result<Option<MovieRef>> {
        Ok(self.movies.iter().find(|m| m.id == id).cloned())
    }
}
