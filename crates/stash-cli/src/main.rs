//! Stash CLI - inspect and edit a client-storage stash file.
//!
//! Drives the client-storage adapter over a JSON file store, so items can be
//! written and read back exactly as a browser-hosted cache would.

mod config;
mod handler;

use anyhow::Result;
use clap::Parser;
use config::CliConfig;
use stash_client_storage::{ClientStorageAdapter, JsonFileStorage};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "stash-cli")]
#[command(about = "Inspect and edit a client-storage stash file")]
struct Args {
    /// Path of the JSON store file
    #[arg(long, env = CliConfig::STORE_ENV, default_value = CliConfig::DEFAULT_STORE)]
    store: PathBuf,

    /// Namespace to bind the adapter to
    #[arg(short, long, env = CliConfig::NAMESPACE_ENV)]
    namespace: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: handler::Command,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the command's JSON output
    let log_level = if args.debug { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    debug!("Using store {}", args.store.display());

    let storage = JsonFileStorage::open(&args.store)?;
    let mut builder = ClientStorageAdapter::builder().storage(storage);
    if let Some(namespace) = args.namespace {
        builder = builder.namespace(namespace);
    }
    let adapter = builder.build()?;

    let output = handler::run(&adapter, args.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
