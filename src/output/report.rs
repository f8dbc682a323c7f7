//! Run report types
//!
//! Every page the walk yields ends up here as a [`PageOutcome`], so callers
//! can count what was saved and what was skipped without scraping logs.

use crate::crawler::FetchError;
use crate::sitemap::SitemapFailure;
use crate::url::PathError;
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Why a page produced no output file
#[derive(Debug, Error)]
pub enum PageFailure {
    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("Cannot map URL to a path: {0}")]
    Path(#[from] PathError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A page that was written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPage {
    /// Destination file
    pub path: PathBuf,

    /// False when the page had no `<main>` element and the diagnostic
    /// message was written instead
    pub main_content: bool,
}

/// Result of processing one page URL
#[derive(Debug)]
pub struct PageOutcome {
    pub url: String,
    pub result: Result<SavedPage, PageFailure>,
}

impl PageOutcome {
    pub fn is_saved(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary of a complete crawl run
#[derive(Debug)]
pub struct CrawlReport {
    pub root_sitemap: String,
    pub output_root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Sitemap documents read, root included
    pub sitemaps_visited: usize,

    /// One entry per yielded page URL, in crawl order
    pub pages: Vec<PageOutcome>,

    /// Sitemap branches and entries that were skipped
    pub sitemap_failures: Vec<SitemapFailure>,
}

impl CrawlReport {
    pub fn pages_saved(&self) -> usize {
        self.pages.iter().filter(|p| p.is_saved()).count()
    }

    pub fn pages_failed(&self) -> usize {
        self.pages.len() - self.pages_saved()
    }

    /// Saved pages whose file holds the no-main-content diagnostic
    pub fn pages_without_main(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(&p.result, Ok(saved) if !saved.main_content))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &PageFailure)> {
        self.pages
            .iter()
            .filter_map(|p| p.result.as_ref().err().map(|e| (p.url.as_str(), e)))
    }

    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }

    /// Percentage of yielded pages that were saved
    pub fn success_rate(&self) -> f64 {
        if self.pages.is_empty() {
            return 0.0;
        }
        (self.pages_saved() as f64 / self.pages.len() as f64) * 100.0
    }
}
