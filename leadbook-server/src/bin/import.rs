//! leadbook-import - merge a CSV file into a dataset from the command line
//!
//! Uses the same root folder resolution, store and merge rules as the server.
//!
//! Usage:
//!   leadbook-import leads_march.csv --dataset leads.csv

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use leadbook_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use leadbook_common::{DatasetName, DatasetService, FsDatasetStore, IngestError, Schema};
use leadbook_server::logging::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "leadbook-import")]
#[command(about = "Merge a CSV file of leads into a stored dataset")]
#[command(version)]
struct Args {
    /// CSV file to import
    file: PathBuf,

    /// Target dataset (defaults to the configured dataset)
    #[arg(short, long)]
    dataset: Option<String>,

    /// Root folder holding the datasets directory
    #[arg(short, long, env = "LEADBOOK_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reject files larger than this many bytes
    #[arg(long)]
    max_bytes: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TomlConfig::load(args.config.as_deref());
    init_tracing(&config.logging.level);

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(args.root_folder.clone())
        .with_config(&config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to prepare datasets directory")?;

    let dataset = args
        .dataset
        .as_deref()
        .or(config.default_dataset.as_deref())
        .map(DatasetName::new)
        .unwrap_or_default();

    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let store = Arc::new(FsDatasetStore::new(initializer.datasets_path()));
    let service = DatasetService::new(Arc::new(Schema::standard()), store);

    match service.upload(&bytes, &dataset, args.max_bytes).await {
        Ok(outcome) => {
            println!("Merged {} into {}", args.file.display(), dataset);
            println!("  New records:     {}", outcome.admitted);
            println!("  Skipped records: {}", outcome.skipped);
            println!("  Duplicate rows:  {}", outcome.duplicates);
            println!("  Total records:   {}", outcome.total);
            Ok(())
        }
        Err(IngestError::Schema {
            source,
            expected,
            received,
        }) => {
            eprintln!("Header mismatch: {}", source);
            eprintln!("  Expected: {}", expected.join(", "));
            eprintln!("  Received: {}", received.join(", "));
            anyhow::bail!("{} was not imported", args.file.display())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to import {}", args.file.display())),
    }
}
