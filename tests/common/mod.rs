//! Shared test harness for integration tests.
//!
//! Builds an [`AppContext`] over an in-memory catalog. The production TMDb
//! client and process runner are wired in but never reached unless a test
//! enables downloads and lists movies without trailers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http_body_util::BodyExt;

use trailerforged::config::Config;
use trailerforged::download::{TokioProcessRunner, TrailerDownloader};
use trailerforged::library::InMemoryCatalog;
use trailerforged::metadata::TmdbClient;
use trailerforged::server::{create_router, AppContext};
use trailerforged_common::MovieRef;

pub struct TestHarness {
    pub ctx: AppContext,
}

impl TestHarness {
    pub fn new(movies: Vec<MovieRef>) -> Self {
        Self::with_config(Config::default(), movies)
    }

    pub fn with_config(config: Config, movies: Vec<MovieRef>) -> Self {
        let config = Arc::new(config);
        let downloader = TrailerDownloader::new(
            &config.downloads,
            Arc::new(TmdbClient::new(&config.tmdb)),
            Arc::new(TokioProcessRunner),
        );
        let ctx = AppContext::new(config, Arc::new(InMemoryCatalog::new(movies)), downloader);
        Self { ctx }
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
