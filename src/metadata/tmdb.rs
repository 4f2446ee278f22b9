//! TMDB (The Movie Database) videos client.
//!
//! Implements [`MetadataApiClient`] by querying `/movie/{id}/videos` on the
//! TMDB v3 REST API.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - 30-second request timeout.
//! - Every failure is a retryable external-service error.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use serde::Deserialize;
use tracing::debug;
use trailerforged_common::{Error, Result};

use super::{MetadataApiClient, VideoResult};
use crate::config::TmdbConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const REQUESTS_PER_SECOND: u32 = 4;

#[derive(Debug, Deserialize)]
struct TmdbVideosResponse {
    #[serde(default)]
    results: Vec<VideoResult>,
}

/// TMDB videos client.
///
/// # Examples
///
/// ```no_run
/// use trailerforged::config::TmdbConfig;
/// use trailerforged::metadata::TmdbClient;
///
/// let client = TmdbClient::new(&TmdbConfig {
///     api_key: "your-api-key".into(),
///     ..TmdbConfig::default()
/// });
/// ```
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client: {}", e);
                reqwest::Client::new()
            });

        let quota = Quota::per_second(
            NonZeroU32::new(REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN),
        );

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            rate_limiter: RateLimiter::direct(quota),
        }
    }
}

#[async_trait]
impl MetadataApiClient for TmdbClient {
    async fn movie_videos(&self, external_id: &str) -> Result<Vec<VideoResult>> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/movie/{}/videos", self.base_url, external_id);
        debug!(url = %url, "TMDB movie videos");

        let resp = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::external(format!("TMDB request timed out: {e}"))
                } else {
                    Error::external(format!("TMDB request failed: {e}"))
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::external(format!("TMDB {status}: {}", body.trim())));
        }

        let body: TmdbVideosResponse = resp
            .json()
            .await
            .map_err(|e| Error::external(format!("TMDB parse error: {e}")))?;

        Ok(body.results)
    }
}
