//! Sitemap module for discovering pages
//!
//! This module handles:
//! - Parsing sitemap and sitemap-index documents
//! - Walking a sitemap tree depth-first into a flat sequence of page URLs
//! - Recording branches that could not be read

mod parser;
mod walker;

pub use parser::{parse_sitemap, SitemapNode};
pub use walker::SitemapWalker;

use crate::crawler::FetchError;
use crate::url::UrlError;
use thiserror::Error;

/// Errors that can occur while reading one sitemap document
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Malformed sitemap XML: {message}")]
    Malformed { message: String },

    #[error("Sitemap document contains no elements")]
    Empty,

    #[error("Sitemap {url} references one of its own ancestors")]
    Cycle { url: String },

    #[error("Invalid <loc> {loc:?}: {source}")]
    InvalidLoc { loc: String, source: UrlError },
}

/// A sitemap branch (or single entry) that was skipped during a walk
#[derive(Debug)]
pub struct SitemapFailure {
    /// The sitemap that failed, or the sitemap that contained a bad entry
    pub url: String,

    /// Why it was skipped
    pub error: SitemapError,
}
