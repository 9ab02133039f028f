//! leadbook-server - HTTP service for CSV lead datasets
//!
//! Serves upload/merge, table data, download and listing for datasets stored
//! as CSV files under `<root folder>/datasets`.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use leadbook_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use leadbook_common::{DatasetName, DatasetService, FsDatasetStore, Schema};
use leadbook_server::api::BUILD;
use leadbook_server::logging::init_tracing;
use leadbook_server::{build_router, AppState};
use tokio::signal;
use tracing::info;

/// Command-line arguments for leadbook-server
#[derive(Parser, Debug)]
#[command(name = "leadbook-server")]
#[command(about = "CSV lead dataset ingestion and merge service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Root folder holding the datasets directory
    #[arg(short, long, env = "LEADBOOK_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Largest accepted upload in bytes (overrides the config file)
    #[arg(long)]
    max_upload_bytes: Option<usize>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TomlConfig::load(args.config.as_deref());

    init_tracing(&config.logging.level);

    info!(
        "Starting leadbook-server v{} [{}] built {} ({})",
        BUILD.version, BUILD.git_hash, BUILD.build_timestamp, BUILD.build_profile
    );

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(args.root_folder.clone())
        .with_config(&config)
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to prepare datasets directory")?;

    let datasets_path = initializer.datasets_path();
    info!("Datasets directory: {}", datasets_path.display());

    let store = Arc::new(FsDatasetStore::new(datasets_path));
    let service = Arc::new(DatasetService::new(Arc::new(Schema::standard()), store));

    let max_upload_bytes = args
        .max_upload_bytes
        .unwrap_or_else(|| config.max_upload_bytes());
    let default_dataset = config
        .default_dataset
        .as_deref()
        .map(DatasetName::new)
        .unwrap_or_default();

    info!(
        "Upload limit {} bytes, default dataset {}",
        max_upload_bytes, default_dataset
    );

    let state = AppState::new(service)
        .with_max_upload_bytes(max_upload_bytes)
        .with_default_dataset(default_dataset)
        .with_cors_origins(config.cors_origins());
    let app = build_router(state);

    let port = args.port.unwrap_or_else(|| config.port());
    let addr = SocketAddr::new(args.host, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("leadbook-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
