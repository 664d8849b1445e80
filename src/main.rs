//! Pracant main entry point
//!
//! Command-line interface for the Pracant job-listing crawler.

use anyhow::Context;
use clap::Parser;
use pracant::config::load_config_with_hash;
use pracant::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pracant: a compliant job-listing crawler
///
/// Pracant walks a job site's paginated listings while respecting
/// robots.txt and a page budget, structures every job posting it finds,
/// and writes JSON/CSV exports plus a summary report.
#[derive(Parser, Debug)]
#[command(name = "pracant")]
#[command(version = "1.0.0")]
#[command(about = "A compliant job-listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    tracing::info!("Starting crawl at {}", config.crawler.start_url);
    crawl(config).await.context("crawl failed")?;
    tracing::info!("Crawl completed successfully");

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pracant=info,warn"),
            1 => EnvFilter::new("pracant=debug,info"),
            2 => EnvFilter::new("pracant=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &pracant::config::Config) {
    println!("=== Pracant Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!(
        "  Max requests per minute: {}",
        config.crawler.max_requests_per_minute
    );
    println!(
        "  Max request retries: {}",
        config.crawler.max_request_retries
    );
    println!(
        "  Request handler timeout: {}s",
        config.crawler.request_handler_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", config.crawler.start_url);
}
