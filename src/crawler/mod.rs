//! Crawler module for mirroring sitemap pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and error classification
//! - Main-content extraction
//! - Output root preparation
//! - Overall crawl coordination

mod coordinator;
mod extract;
mod fetcher;
mod output_dir;

pub use coordinator::{run_crawl, Coordinator};
pub use extract::{extract_main_content, ExtractError, DENYLISTED_TAGS, MAIN_CONTENT_TAG};
pub use fetcher::{build_http_client, fetch_text, user_agent_string, FetchError};
pub use output_dir::{check_clearable, prepare_output_dir};
