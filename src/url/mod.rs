//! URL handling module for Sitemap-Mirror
//!
//! This module maps URLs onto the output directory tree and resolves the
//! `<loc>` values found in sitemap documents.

mod path;

use thiserror::Error;
use url::Url;

// Re-export main functions
pub use path::{
    page_path, sitemap_path, PathError, DEFAULT_FILE_NAME, PAGE_EXTENSION, SITEMAP_DIR,
};

/// URL-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Resolves a sitemap `<loc>` value to an absolute HTTP(S) URL
///
/// Absolute values are taken as-is; relative ones are joined onto the URL
/// of the sitemap that contained them.
///
/// # Arguments
///
/// * `loc` - The raw `<loc>` text (surrounding whitespace is ignored)
/// * `base` - The URL of the sitemap document
///
/// # Examples
///
/// ```
/// use sitemap_mirror::url::resolve_loc;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/sitemaps/index.xml").unwrap();
/// let url = resolve_loc("posts.xml", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/sitemaps/posts.xml");
/// ```
pub fn resolve_loc(loc: &str, base: &Url) -> Result<Url, UrlError> {
    let loc = loc.trim();
    if loc.is_empty() {
        return Err(UrlError::Parse("empty <loc>".to_string()));
    }

    let url = base.join(loc).map_err(|e| UrlError::Parse(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            other
        ))),
    }
}
