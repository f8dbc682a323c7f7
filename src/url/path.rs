//! Mapping of page and sitemap URLs onto the output directory tree
//!
//! A page lands at `<root>/<host>/<decoded directory>/<file name>`. The
//! directory part is percent-decoded so that spaces and accented characters
//! show up literally on disk; the file name keeps the raw last path segment.
//!
//! Raw sitemap documents live in a separate `<root>/[sitemaps]/<host>/...`
//! tree, so a sitemap at `/feed` never occupies the spot a page under
//! `/feed/` needs as a directory.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// File name used when a page URL ends with a slash
pub const DEFAULT_FILE_NAME: &str = "index";

/// Extension every saved page carries
pub const PAGE_EXTENSION: &str = ".html";

/// File name used when a sitemap URL ends with a slash
const DEFAULT_SITEMAP_NAME: &str = "sitemap.xml";

/// Top-level directory holding mirrored sitemap documents
///
/// `[` and `]` only appear in IPv6 hosts, so no page host maps to this name.
pub const SITEMAP_DIR: &str = "[sitemaps]";

/// Errors raised while deriving a destination path
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("URL path segment {segment:?} cannot be used on the filesystem")]
    InvalidSegment { segment: String },
}

/// Derives the destination file for a page URL
///
/// # Arguments
///
/// * `page` - The absolute page URL
/// * `output_root` - The root of the mirrored tree
///
/// # Returns
///
/// * `Ok(PathBuf)` - Where the extracted content should be written
/// * `Err(PathError)` - The URL has no host or decodes to an unusable segment
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sitemap_mirror::url::page_path;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/a/b/page").unwrap();
/// let path = page_path(&page, Path::new("out")).unwrap();
/// assert_eq!(path, Path::new("out/example.com/a/b/page.html"));
///
/// let home = Url::parse("https://example.com/").unwrap();
/// let path = page_path(&home, Path::new("out")).unwrap();
/// assert_eq!(path, Path::new("out/example.com/index.html"));
/// ```
pub fn page_path(page: &Url, output_root: &Path) -> Result<PathBuf, PathError> {
    let mut path = host_dir(page, output_root)?;

    let decoded = percent_decode_str(page.path()).decode_utf8_lossy();
    let (decoded_dir, _) = split_last_segment(&decoded);
    push_segments(&mut path, decoded_dir)?;

    let (_, raw_name) = split_last_segment(page.path());
    path.push(page_file_name(raw_name));

    Ok(path)
}

/// Derives the destination file for a raw sitemap document
///
/// Unlike pages, every segment (including the file name) is decoded and
/// the original extension is kept. The result is under [`SITEMAP_DIR`].
pub fn sitemap_path(sitemap: &Url, output_root: &Path) -> Result<PathBuf, PathError> {
    let mut path = host_dir(sitemap, &output_root.join(SITEMAP_DIR))?;

    let decoded = percent_decode_str(sitemap.path()).decode_utf8_lossy();
    let (decoded_dir, name) = split_last_segment(&decoded);
    push_segments(&mut path, decoded_dir)?;

    if is_skipped_segment(name) {
        path.push(DEFAULT_SITEMAP_NAME);
    } else {
        check_segment(name)?;
        path.push(name);
    }

    Ok(path)
}

fn host_dir(url: &Url, output_root: &Path) -> Result<PathBuf, PathError> {
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| PathError::MissingHost(url.to_string()))?;
    Ok(output_root.join(host))
}

/// Splits a `/`-separated path into (everything before the last slash, last segment)
fn split_last_segment(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

/// Pushes the directory segments of `dir`, dropping empty, `.` and `..` parts
fn push_segments(path: &mut PathBuf, dir: &str) -> Result<(), PathError> {
    for segment in dir.split('/') {
        if is_skipped_segment(segment) {
            continue;
        }
        check_segment(segment)?;
        path.push(segment);
    }
    Ok(())
}

fn is_skipped_segment(segment: &str) -> bool {
    segment.is_empty() || segment == "." || segment == ".."
}

fn check_segment(segment: &str) -> Result<(), PathError> {
    if segment.contains('\0') {
        return Err(PathError::InvalidSegment {
            segment: segment.replace('\0', "\\0"),
        });
    }
    Ok(())
}

fn page_file_name(raw_name: &str) -> String {
    let name = if raw_name.is_empty() {
        DEFAULT_FILE_NAME
    } else {
        raw_name
    };

    if name.ends_with(PAGE_EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, PAGE_EXTENSION)
    }
}
