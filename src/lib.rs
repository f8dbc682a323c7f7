//! Sitemap-Mirror: a sitemap-driven content mirror
//!
//! This crate walks a site's sitemap hierarchy, fetches every listed page,
//! keeps only the `<main>` content region with noise elements stripped, and
//! writes the result into a directory tree that mirrors the site's URL paths.

pub mod config;
pub mod crawler;
pub mod output;
pub mod sitemap;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sitemap-Mirror operations
///
/// Only failures that abort a whole run surface here. Per-page and
/// per-sitemap failures are recorded in the [`output::CrawlReport`].
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to prepare output directory {}: {source}", path.display())]
    OutputPreparation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Root sitemap {url} could not be read: {source}")]
    RootSitemap {
        url: String,
        source: sitemap::SitemapError,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to write run report: {0}")]
    Report(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sitemap-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{extract_main_content, run_crawl, Coordinator, ExtractError};
pub use output::{CrawlReport, PageOutcome};
pub use sitemap::{parse_sitemap, SitemapNode, SitemapWalker};
pub use url::{page_path, sitemap_path, PathError};
