//! Output module for run reports
//!
//! This module handles:
//! - Recording the outcome of every page and skipped sitemap
//! - Printing run statistics to the terminal
//! - Writing a markdown report of a run

mod markdown;
mod report;
pub mod stats;

pub use markdown::{format_markdown_report, generate_markdown_report, write_report};
pub use report::{CrawlReport, PageFailure, PageOutcome, SavedPage};
pub use stats::print_statistics;

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
