use crate::config::Config;
use crate::download::{TokioProcessRunner, TrailerDownloader};
use crate::library::{FsCatalog, LibraryCatalog};
use crate::metadata::TmdbClient;
use crate::scanner::{LibraryScanner, ScanService};
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod request_id;
pub mod routes_trailers;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Read-only movie snapshots
    pub catalog: Arc<dyn LibraryCatalog>,
    /// Single-flight scan runner shared by the API and the scheduler
    pub scans: Arc<ScanService>,
    /// Cancelled on shutdown; scans run on child tokens
    pub shutdown: CancellationToken,
}

impl AppContext {
    /// Wire the production collaborators: filesystem catalog, TMDb and yt-dlp.
    pub fn from_config(config: Config) -> Self {
        let config = Arc::new(config);
        let catalog: Arc<dyn LibraryCatalog> =
            Arc::new(FsCatalog::new(config.library.paths.clone()));
        let downloader = TrailerDownloader::new(
            &config.downloads,
            Arc::new(TmdbClient::new(&config.tmdb)),
            Arc::new(TokioProcessRunner),
        );
        Self::new(config, catalog, downloader)
    }

    pub fn new(
        config: Arc<Config>,
        catalog: Arc<dyn LibraryCatalog>,
        downloader: TrailerDownloader,
    ) -> Self {
        let scanner = LibraryScanner::new(config.clone(), catalog.clone(), Arc::new(downloader));
        Self {
            config,
            catalog,
            scans: Arc::new(ScanService::new(scanner)),
            shutdown: CancellationToken::new(),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health_check))
        .merge(routes_trailers::trailer_routes())
        .fallback(route_not_found)
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn route_not_found(
    request_id: request_id::RequestId,
    uri: axum::http::Uri,
) -> impl IntoResponse {
    let body = error::ErrorBody {
        error_code: "NOT_FOUND",
        message: format!("no route for {}", uri.path()),
        details: None,
        request_id: Some(request_id.0),
    };
    (StatusCode::NOT_FOUND, axum::Json(body))
}

/// Start the HTTP server and the scan scheduler
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = AppContext::from_config(config);
    let shutdown = ctx.shutdown.clone();

    let scheduler = if ctx.config.downloads.enabled {
        let interval = ctx.config.downloads.scan_interval();
        Some(tokio::spawn(
            ctx.scans.clone().run_schedule(interval, shutdown.child_token()),
        ))
    } else {
        tracing::info!("Trailer downloads disabled, scheduler not started");
        None
    };

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    let signal_token = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            signal_token.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Some(handle) = scheduler {
        let _ = handle.await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
