//! Sitemap-Mirror main entry point
//!
//! This is the command-line interface for the Sitemap-Mirror content mirror.

use anyhow::Context;
use clap::Parser;
use sitemap_mirror::config::{load_config_with_hash, validate, Config};
use sitemap_mirror::crawler::Coordinator;
use sitemap_mirror::output::{print_statistics, write_report};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap-Mirror: mirror a site's main content from its sitemaps
///
/// Sitemap-Mirror walks a sitemap (or sitemap index) tree, fetches every
/// listed page, keeps only its <main> element without scripts, styles,
/// images, forms and SVG, and writes it under a directory tree that
/// follows the site's URL paths.
#[derive(Parser, Debug)]
#[command(name = "sitemap-mirror")]
#[command(version)]
#[command(about = "Mirror the main content of every page in a sitemap", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Root sitemap URL (overrides the config file)
    #[arg(short, long, value_name = "URL")]
    sitemap: Option<String>,

    /// Output directory, cleared before the crawl (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Write a markdown run report to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Also save every fetched sitemap document into the output directory
    #[arg(long)]
    save_sitemaps: bool,

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

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let root = config.root_sitemap()?;
    let report_path = config.output.report_path.clone();

    let coordinator = Coordinator::new(config).context("Failed to build HTTP client")?;
    let report = match coordinator.run().await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl of {} failed: {}", root, e);
            return Err(e.into());
        }
    };

    if let Some(path) = report_path {
        write_report(&report, &path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    if !cli.quiet {
        print_statistics(&report);
    }

    Ok(())
}

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(sitemap) = &cli.sitemap {
        config.crawler.sitemap_url = Some(sitemap.clone());
    }
    if let Some(output) = &cli.output {
        config.crawler.output_dir = output.clone();
    }
    if let Some(report) = &cli.report {
        config.output.report_path = Some(report.clone());
    }
    if cli.save_sitemaps {
        config.crawler.save_sitemaps = true;
    }

    validate(&config)?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_mirror=info,warn"),
            1 => EnvFilter::new("sitemap_mirror=debug,info"),
            2 => EnvFilter::new("sitemap_mirror=trace,debug"),
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
