//! Trailer lookup, preview settings and scan control.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use trailerforged_common::{Error, MovieId, TrailerDescriptor};

use super::error::AppError;
use super::request_id::RequestId;
use super::AppContext;
use crate::config::PreviewConfig;
use crate::scanner::ScanStatus;
use crate::trailers;

pub fn trailer_routes() -> Router<AppContext> {
    Router::new()
        .route("/TrailerInfo/:movie_id", get(get_trailer_info))
        .route("/TrailerPreview/Config", get(get_preview_config))
        .route("/Trailers/Scan", get(get_scan_status).post(start_scan))
}

/// Parse a movie id, rejecting blanks and the nil GUID.
pub fn parse_movie_id(raw: &str) -> Result<MovieId, Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::invalid_input("movie id is required"));
    }
    let id: MovieId = raw
        .parse()
        .map_err(|_| Error::invalid_input(format!("'{raw}' is not a valid movie id")))?;
    if id.is_nil() {
        return Err(Error::invalid_input("movie id cannot be empty"));
    }
    Ok(id)
}

/// Resolve the preview trailer for a movie.
pub async fn get_trailer_info(
    State(ctx): State<AppContext>,
    request_id: RequestId,
    movie_id: Result<Path<String>, PathRejection>,
) -> Result<Json<TrailerDescriptor>, AppError> {
    let Path(movie_id) = movie_id.map_err(|rejection| {
        AppError::new(Error::invalid_input("movie id is not a valid path segment"))
            .with_details(rejection.body_text())
            .with_request_id(request_id.0.clone())
    })?;

    lookup_trailer(&ctx, &movie_id)
        .await
        .map(Json)
        .map_err(|e| AppError::new(e).with_request_id(request_id.0))
}

async fn lookup_trailer(ctx: &AppContext, raw_id: &str) -> Result<TrailerDescriptor, Error> {
    let id = parse_movie_id(raw_id)?;

    let movie = ctx
        .catalog
        .get_movie(id)
        .await
        .map_err(|e| Error::internal(format!("library lookup failed: {e}")))?
        .ok_or(Error::MovieNotFound)?;

    let descriptor = trailers::resolve(&movie).ok_or(Error::TrailerNotFound)?;
    tracing::debug!(
        movie = %movie.name,
        origin = %descriptor.origin,
        source = %descriptor.source,
        "Resolved trailer"
    );
    Ok(descriptor)
}

/// Client-facing preview settings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSettings {
    pub enabled: bool,
    pub hover_delay_ms: u32,
    pub width: u32,
    pub height: u32,
    pub muted: bool,
}

impl From<&PreviewConfig> for PreviewSettings {
    fn from(config: &PreviewConfig) -> Self {
        Self {
            enabled: config.enabled,
            hover_delay_ms: config.hover_delay_ms,
            width: config.width,
            height: config.height,
            muted: config.muted,
        }
    }
}

pub async fn get_preview_config(State(ctx): State<AppContext>) -> Json<PreviewSettings> {
    Json(PreviewSettings::from(&ctx.config.preview))
}

pub async fn get_scan_status(State(ctx): State<AppContext>) -> Json<ScanStatus> {
    Json(ctx.scans.status())
}

/// Start a background scan.
pub async fn start_scan(
    State(ctx): State<AppContext>,
    request_id: RequestId,
) -> Result<impl IntoResponse, AppError> {
    ctx.scans
        .spawn_scan(ctx.shutdown.child_token())
        .map_err(|e| AppError::new(e).with_request_id(request_id.0))?;

    tracing::info!("Trailer scan started via API");
    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "status": "started" })),
    ))
}
