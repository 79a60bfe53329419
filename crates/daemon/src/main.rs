//! AssetView Daemon
//!
//! Read-only HTTP browser for a directory of game assets.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use daemon::config::{default_config_path, Config};
use daemon::files::AssetLibrary;
use daemon::protocol::{Entry, SearchResult};
use daemon::AssetServer;
use tracing_subscriber::EnvFilter;

/// AssetView - read-only browser for game asset directories.
#[derive(Parser, Debug)]
#[command(name = "assetview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// Asset root directory (overrides config and ASSETVIEW_ROOT)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// Listen address (overrides config and ASSETVIEW_BIND)
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },

    /// List a directory relative to the asset root
    Browse {
        /// Directory to list (defaults to the root)
        #[arg(default_value = "")]
        path: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Search asset names and tags
    Search {
        /// Case-insensitive search term (at least 2 characters)
        query: String,

        /// Directory to search below (defaults to the root)
        #[arg(long, short, value_name = "PATH")]
        path: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the contents of a text asset
    Show {
        /// File to print, relative to the asset root
        path: String,
    },

    /// Print the effective configuration
    Config {
        /// Save the effective configuration to the config file path
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = Config::load(&config_path)?;

    // Initialize tracing
    let filter = log_filter(cli.verbose, &config);
    tracing_subscriber::fmt().with_env_filter(filter).init();
    tracing::debug!("Using config file: {:?}", config_path);

    // Apply environment variable overrides
    config.apply_env_overrides();

    if let Commands::Serve { root, bind } = &cli.command {
        if let Some(root) = root {
            config.assets.root = root.clone();
        }
        if let Some(bind) = bind {
            config.server.bind = *bind;
        }
    }

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Serve { .. } => run_server(&config).await?,
        Commands::Browse { path, json } => {
            let library = open_library(&config)?;
            let response = library.browse(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("/{}", response.current_path);
                print_entries(&response.directories, &response.files);
            }
        }
        Commands::Search { query, path, json } => {
            let library = open_library(&config)?;
            let results = library.search(&query, path.as_deref())?;
            if json {
                let response = daemon::protocol::SearchResponse::new(query, results);
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_search_results(&results);
            }
        }
        Commands::Show { path } => {
            let library = open_library(&config)?;
            let content = library.read_text(&path)?;
            print!("{}", content.content);
        }
        Commands::Config { write } => {
            print!("{}", config.to_toml()?);
            if write {
                config.save(&config_path)?;
                eprintln!("Configuration written to {}", config_path.display());
            }
        }
    }

    Ok(())
}

/// Pick the log filter: `RUST_LOG` wins, then `--verbose`, then the
/// configured level (with `ASSETVIEW_LOG_LEVEL` applied).
fn log_filter(verbose: bool, config: &Config) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    if verbose {
        return EnvFilter::new("debug");
    }
    let level = std::env::var("ASSETVIEW_LOG_LEVEL")
        .ok()
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| config.daemon.log_level.clone());
    EnvFilter::try_new(level.to_lowercase()).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_library(config: &Config) -> anyhow::Result<AssetLibrary> {
    AssetLibrary::from_config(&config.assets)
        .with_context(|| format!("Failed to open asset root: {}", config.assets.root.display()))
}

/// Run the HTTP service until SIGTERM or SIGINT.
async fn run_server(config: &Config) -> anyhow::Result<()> {
    let server = AssetServer::start(config).await?;
    tracing::info!("AssetView ready at http://{}", server.addr());

    wait_for_shutdown_signal().await?;
    tracing::info!("Received shutdown signal");

    server.stop().await
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
async fn wait_for_shutdown_signal() -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to register SIGTERM handler")?;
    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to register SIGINT handler")?;

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM");
        }
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT");
        }
    }

    Ok(())
}

/// Print a listing as an aligned table, directories first.
fn print_entries(directories: &[Entry], files: &[Entry]) {
    if directories.is_empty() && files.is_empty() {
        println!("Empty directory.");
        return;
    }

    println!("{:<9}  {:>10}  NAME", "TYPE", "SIZE");
    println!("{}", "-".repeat(40));

    for entry in directories {
        println!("{:<9}  {:>10}  {}/", entry.kind, "-", entry.name);
    }
    for entry in files {
        let size = entry.size.map(format_size).unwrap_or_else(|| "-".to_string());
        println!("{:<9}  {:>10}  {}", entry.kind, size, entry.name);
    }

    println!();
    println!(
        "Total: {} director(ies), {} file(s)",
        directories.len(),
        files.len()
    );
}

/// Print search hits one per line.
fn print_search_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No matches.");
        return;
    }

    for result in results {
        println!("{:<9}  {}", result.kind, result.path);
    }

    println!();
    println!("Total: {} match(es)", results.len());
}

/// Format a byte count with a binary unit (e.g., "2.0 KiB").
fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
