mod cli;

use trailerforged::{
    config, download,
    library::{FsCatalog, LibraryCatalog},
    scanner::NoProgress,
    server::{self, AppContext},
    trailers,
};
use trailerforged_common::MovieId;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting Trailerforged server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!(
        libraries = config.library.paths.len(),
        downloads = config.downloads.enabled,
        quality = %config.downloads.quality,
        "Trailer settings loaded"
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "trailerforged=trace,trailerforged_common=debug,tower_http=debug".to_string()
        } else {
            "trailerforged=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Scan => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_scan(cli.config.as_deref()))
        }
        Commands::Resolve { target } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(resolve_movie(&target, cli.config.as_deref()))
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("trailerforged {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn run_scan(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let ctx = AppContext::from_config(config);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, stopping scan after the current movie");
            on_ctrl_c.cancel();
        }
    });

    let result = ctx
        .scans
        .scanner()
        .run_scan(&NoProgress, &cancel)
        .await
        .context("Trailer scan could not start")?;

    println!("Processed:  {}", result.processed);
    println!("Downloaded: {}", result.downloaded);
    println!("Errors:     {}", result.errors.len());
    for error in &result.errors {
        println!("  {}: {}", error.movie, error.message);
    }
    if result.cancelled {
        println!("Scan was cancelled before completion.");
    }

    Ok(())
}

async fn resolve_movie(target: &str, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let (catalog, id) = match target.parse::<MovieId>() {
        Ok(id) => (FsCatalog::new(config.library.paths.clone()), id),
        Err(_) => {
            let path = std::fs::canonicalize(target)
                .with_context(|| format!("Movie file does not exist: {}", target))?;
            let root = path
                .parent()
                .map(PathBuf::from)
                .context("Movie file has no parent directory")?;
            (FsCatalog::new(vec![root]), MovieId::from_path(&path))
        }
    };

    let movie = catalog
        .get_movie(id)
        .await?
        .with_context(|| format!("Movie not found: {}", target))?;

    match trailers::resolve(&movie) {
        Some(descriptor) => {
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
            Ok(())
        }
        None => anyhow::bail!("No trailer found for {}", movie.name),
    }
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external tools...\n");

    let tool = download::check_downloader(&config.downloads.downloader_path);
    let status = if tool.available { "✓" } else { "✗" };

    print!("{} {}", status, tool.name);
    if let Some(ref version) = tool.version {
        print!(" ({})", version);
    }
    if let Some(ref path) = tool.path {
        print!(" - {}", path.display());
    }
    println!();

    println!();
    if tool.available {
        println!("All required tools are available!");
    } else {
        println!("The trailer downloader is missing. Install yt-dlp to enable trailer downloads.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("✓ Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!(
        "  Preview: enabled={}, delay={}ms, {}x{}, muted={}",
        config.preview.enabled,
        config.preview.hover_delay_ms,
        config.preview.width,
        config.preview.height,
        config.preview.muted
    );
    println!(
        "  Downloads: enabled={}, quality={}, every {}h",
        config.downloads.enabled, config.downloads.quality, config.downloads.scan_interval_hours
    );
    println!("  Library paths: {}", config.library.paths.len());

    Ok(())
}
