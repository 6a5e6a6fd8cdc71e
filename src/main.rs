//! Site-Graph main entry point
//!
//! Starts the HTTP frontend that crawls websites on demand and returns their
//! host-level link graph.

use anyhow::Context;
use clap::Parser;
use site_graph::config::{load_config_with_hash, validate, Config};
use site_graph::server::{self, AppState};
use site_graph::Crawler;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Site-Graph: a concurrent website link mapper
///
/// Serves `GET /graph?url=<seed>&depth=<n>`, which crawls outward from the
/// seed and returns the graph of sites linking to one another.
#[derive(Parser, Debug)]
#[command(name = "site-graph")]
#[command(version)]
#[command(about = "A concurrent website link mapper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overriding `server.bind-address`
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and print it without starting the server
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    validate(&config).context("invalid configuration")?;

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    run_server(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_graph=info,warn"),
            1 => EnvFilter::new("site_graph=debug,info"),
            2 => EnvFilter::new("site_graph=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn print_dry_run(config: &Config) {
    println!("=== Site-Graph Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Strategy: {}", config.crawler.strategy);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Queue capacity: {}", config.crawler.queue_capacity);
    println!("  Fetch timeout: {}ms", config.crawler.fetch_timeout_ms);
    println!("  Enqueue timeout: {}ms", config.crawler.enqueue_timeout_ms);
    match config.crawler.crawl_timeout() {
        Some(limit) => println!("  Crawl deadline: {:?}", limit),
        None => println!("  Crawl deadline: none"),
    }
    println!("  Max depth: {}", config.crawler.max_depth);

    println!("\nUser Agent:");
    println!("  Header: {}", config.user_agent.header_value());

    println!("\nServer:");
    println!("  Bind address: {}", config.server.bind_address);

    println!("\n✓ Configuration is valid");
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let crawler = Crawler::new(&config).context("failed to build HTTP client")?;
    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_address))?;

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown requested, cancelling running crawls");
                on_signal.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    let state = AppState::new(crawler, config, shutdown);
    server::serve(listener, state).await?;
    Ok(())
}
