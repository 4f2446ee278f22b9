//! Trailerforged - hover trailer previews for movie libraries
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod download;
pub mod library;
pub mod metadata;
pub mod scanner;
pub mod server;
pub mod trailers;
