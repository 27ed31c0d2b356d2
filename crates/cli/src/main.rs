mod cli;
mod shell;

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinelog_core::{
    load_config, load_config_or_default, validate_config, Config, CsvStore, JsonStore,
    MetadataLookup, MovieStore, OmdbClient, SanitizedConfig, StorageBackend,
};

use cli::{Cli, DEFAULT_CONFIG_PATH};
use shell::Shell;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so they never interleave with the menu
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => load_config_or_default(Path::new(DEFAULT_CONFIG_PATH))
            .with_context(|| format!("Failed to load config from {:?}", DEFAULT_CONFIG_PATH))?,
    };

    cli.apply_overrides(&mut config);
    validate_config(&config).context("Configuration validation failed")?;

    if cli.print_config {
        let sanitized = SanitizedConfig::from(&config);
        println!("{}", serde_json::to_string_pretty(&sanitized)?);
        return Ok(());
    }

    let store = open_store(&config)?;
    info!("Using {} store at {}", store.name(), store.path().display());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(store, config.site.clone(), stdin.lock(), stdout.lock());
    shell.run().await.context("Terminal I/O failed")?;

    Ok(())
}

fn open_store(config: &Config) -> Result<Arc<dyn MovieStore>> {
    let path = config.storage.resolved_path();

    let store: Arc<dyn MovieStore> = match config.storage.backend {
        StorageBackend::Csv => Arc::new(
            CsvStore::open(&path)
                .with_context(|| format!("Failed to open catalog {:?}", path))?,
        ),
        StorageBackend::Json => match &config.omdb {
            Some(omdb) => {
                let client: Arc<dyn MetadataLookup> = Arc::new(
                    OmdbClient::new(omdb.clone()).context("Failed to create OMDb client")?,
                );
                Arc::new(
                    JsonStore::with_lookup(&path, client)
                        .with_context(|| format!("Failed to open catalog {:?}", path))?,
                )
            }
            None => Arc::new(
                JsonStore::open(&path)
                    .with_context(|| format!("Failed to open catalog {:?}", path))?,
            ),
        },
    };

    Ok(store)
}
