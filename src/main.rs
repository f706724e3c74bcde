//! Sitescope main entry point
//!
//! This is the command-line interface for the Sitescope site crawler.

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use sitescope::config::{load_config_with_hash, validate, Config, EngineConfig, ScraperConfig};
use sitescope::output::{generate_markdown_report, print_report, RunInfo};
use sitescope::Scraper;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitescope: a domain-scoped site crawler
///
/// Sitescope crawls a single website from a seed URL, staying on the
/// site's own host, and reports per-page fetch statistics.
#[derive(Parser, Debug)]
#[command(name = "sitescope")]
#[command(version)]
#[command(about = "A domain-scoped site crawler", long_about = None)]
struct Cli {
    /// Seed URL to crawl (overrides the config file's website)
    #[arg(value_name = "URL", required_unless_present = "config")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Scraper ID shown in log lines
    #[arg(long)]
    id: Option<i32>,

    /// Maximum number of link hops from the seed
    #[arg(long)]
    max_depth: Option<u32>,

    /// Only fetch the seed page, do not follow links
    #[arg(long)]
    no_follow: bool,

    /// Fetch pages one at a time
    #[arg(long)]
    sync: bool,

    /// Maximum number of concurrent fetches
    #[arg(long)]
    parallelism: Option<u32>,

    /// User agent sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Write a markdown report to this path
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    validate(&config).context("Invalid configuration")?;

    run_scrape(config, cli.summary.as_deref()).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitescope=info,warn"),
            1 => EnvFilter::new("sitescope=debug,info"),
            2 => EnvFilter::new("sitescope=trace,debug"),
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

/// Loads the config file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            let Some(url) = &cli.url else {
                bail!("A seed URL or --config file is required");
            };
            Config {
                scraper: ScraperConfig::new(url.clone()),
                engine: EngineConfig::default(),
            }
        }
    };

    let scraper = &mut config.scraper;
    if let Some(url) = &cli.url {
        scraper.website = url.clone();
    }
    if let Some(id) = cli.id {
        scraper.id = id;
    }
    if let Some(max_depth) = cli.max_depth {
        scraper.max_depth = max_depth;
    }
    if cli.no_follow {
        scraper.recursively = false;
    }
    if cli.sync {
        scraper.async_mode = false;
    } else if cli.parallelism.is_some() {
        scraper.async_mode = true;
    }
    if cli.quiet {
        scraper.print_logs = false;
    }

    let engine = &mut config.engine;
    if let Some(parallelism) = cli.parallelism {
        engine.parallelism = parallelism;
    }
    if let Some(user_agent) = &cli.user_agent {
        engine.user_agent = user_agent.clone();
    }
    if let Some(timeout) = cli.timeout {
        engine.request_timeout = timeout;
    }

    Ok(config)
}

/// Runs the scrape, prints the report and optionally writes the markdown summary
async fn run_scrape(config: Config, summary: Option<&std::path::Path>) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} (max depth {}, {})",
        config.scraper.website,
        config.scraper.max_depth,
        if config.scraper.async_mode { "async" } else { "sync" }
    );

    let started_at = Utc::now();
    let scraper = Scraper::with_engine_config(config.scraper.clone(), config.engine);

    if let Err(e) = scraper.scrape().await {
        tracing::error!("Scrape failed: {}", e);
        return Err(e.into());
    }

    let stats = scraper.report();
    let finished_at = Utc::now();

    print_report(&stats);

    if let Some(path) = summary {
        let run = RunInfo {
            scraper_id: config.scraper.id,
            website: config.scraper.website,
            max_depth: config.scraper.max_depth,
            started_at,
            finished_at,
        };
        generate_markdown_report(&run, &stats, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("✓ Report written to: {}", path.display());
    }

    Ok(())
}
