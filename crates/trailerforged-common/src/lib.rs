//! Trailerforged-Common: Shared types, IDs, and errors.
//!
//! This crate provides the vocabulary used across trailerforged:
//!
//! - **Typed IDs**: UUID wrappers for movies and trailers
//! - **Core Types**: Movie snapshots and the resolved [`TrailerDescriptor`]
//! - **Path Utilities**: Video and trailer file detection by name
//! - **Error Handling**: The error taxonomy shared by the resolver,
//!   downloader, scanner, and HTTP layer
//!
//! # Examples
//!
//! ```
//! use trailerforged_common::{MovieId, TrailerOrigin, Error, Result};
//! use trailerforged_common::paths::is_trailer_file;
//! use std::path::Path;
//!
//! let movie_id = MovieId::new();
//! assert!(!movie_id.is_nil());
//!
//! assert!(is_trailer_file(Path::new("Alien (1979)-trailer.mkv")));
//! assert_eq!(TrailerOrigin::Local.to_string(), "Local");
//!
//! fn example() -> Result<()> {
//!     Err(Error::TrailerNotFound)
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{DownloaderErrorKind, Error, Result};
pub use ids::*;
pub use types::*;
