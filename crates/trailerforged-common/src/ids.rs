//! Typed ID wrappers for movies and trailers.
//!
//! Newtype wrappers around UUIDs so a trailer id can never be passed where a
//! movie id is expected.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a movie in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(Uuid);

impl MovieId {
    /// Generate a new random movie ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derive a stable ID from a filesystem path.
    ///
    /// The same path always yields the same ID, so IDs survive rescans.
    #[must_use]
    pub fn from_path(path: &std::path::Path) -> Self {
        Self(Uuid::new_v5(
            &Uuid::NAMESPACE_URL,
            path.to_string_lossy().as_bytes(),
        ))
    }

    /// Whether this is the all-zero ("empty") GUID.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for MovieId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for MovieId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<MovieId> for Uuid {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl FromStr for MovieId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a local trailer file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrailerId(Uuid);

impl TrailerId {
    /// Derive a stable ID from the trailer's filesystem path.
    #[must_use]
    pub fn from_path(path: &std::path::Path) -> Self {
        Self(Uuid::new_v5(
            &Uuid::NAMESPACE_URL,
            path.to_string_lossy().as_bytes(),
        ))
    }
}

impl From<Uuid> for TrailerId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::fmt::Display for TrailerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_movie_id_from_path_is_stable() {
        let a = MovieId::from_path(Path::new("/movies/Alien (1979)/Alien.mkv"));
        let b = MovieId::from_path(Path::new("/movies/Alien (1979)/Alien.mkv"));
        let c = MovieId::from_path(Path::new("/movies/Aliens (1986)/Aliens.mkv"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_movie_id_parse_and_display() {
        let id = MovieId::new();
        let parsed: MovieId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-guid".parse::<MovieId>().is_err());
    }

    #[test]
    fn test_nil_movie_id() {
        let id: MovieId = "00000000-0000-0000-0000-000000000000".parse().unwrap();
        assert!(id.is_nil());
        assert!(!MovieId::new().is_nil());
    }

    #[test]
    fn test_movie_id_serializes_transparently() {
        let uuid = Uuid::new_v4();
        let id = MovieId::from(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }
}
