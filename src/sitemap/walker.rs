//! Depth-first sitemap walker
//!
//! The walker expands a sitemap tree into a flat, pre-order sequence of page
//! URLs. Documents are fetched lazily as the walk reaches them, so only the
//! sitemaps on the current branch are held in memory at any time.

use crate::crawler::fetch_text;
use crate::sitemap::{parse_sitemap, SitemapError, SitemapFailure, SitemapNode};
use crate::url::{resolve_loc, sitemap_path};
use reqwest::Client;
use std::collections::VecDeque;
use std::path::PathBuf;
use url::Url;

/// One open sitemap on the current branch
#[derive(Debug)]
struct Frame {
    url: Url,
    is_index: bool,
    remaining: VecDeque<String>,
}

impl Frame {
    fn new(url: Url, node: SitemapNode) -> Self {
        let is_index = node.is_index();
        let remaining = match node {
            SitemapNode::Index(locs) | SitemapNode::Leaf(locs) => locs.into(),
        };
        Self {
            url,
            is_index,
            remaining,
        }
    }
}

/// Lazily walks a sitemap tree, yielding page URLs in document order
///
/// # Failure handling
///
/// A child sitemap that cannot be fetched or parsed, a child that points
/// back at one of its ancestors, and a `<loc>` that does not resolve to an
/// HTTP(S) URL are each logged, recorded in [`SitemapWalker::failures`] and
/// skipped. The walk then continues with the next sibling.
///
/// # Example
///
/// ```no_run
/// use sitemap_mirror::sitemap::SitemapWalker;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = reqwest::Client::new();
/// let root = Url::parse("https://example.com/sitemap.xml")?;
/// let mut walker = SitemapWalker::open(&client, root, None).await?;
/// while let Some(page) = walker.next_page().await {
///     println!("{}", page);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SitemapWalker<'a> {
    client: &'a Client,
    stack: Vec<Frame>,
    failures: Vec<SitemapFailure>,
    sitemaps_visited: usize,
    mirror_root: Option<PathBuf>,
}

impl<'a> SitemapWalker<'a> {
    /// Fetches the root sitemap and prepares the walk
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client used for every sitemap request
    /// * `root` - The root sitemap URL
    /// * `mirror_root` - If set, every fetched sitemap document is also
    ///   written under this directory
    ///
    /// # Returns
    ///
    /// * `Ok(SitemapWalker)` - The root sitemap was read
    /// * `Err(SitemapError)` - The root sitemap could not be fetched or parsed
    pub async fn open(
        client: &'a Client,
        root: Url,
        mirror_root: Option<PathBuf>,
    ) -> Result<Self, SitemapError> {
        let mut walker = Self {
            client,
            stack: Vec::new(),
            failures: Vec::new(),
            sitemaps_visited: 0,
            mirror_root,
        };

        let frame = walker.load(root).await?;
        walker.stack.push(frame);
        Ok(walker)
    }

    /// Returns the next page URL, or `None` once the tree is exhausted
    pub async fn next_page(&mut self) -> Option<Url> {
        loop {
            let (parent, is_index, loc) = {
                let frame = self.stack.last_mut()?;
                match frame.remaining.pop_front() {
                    Some(loc) => (frame.url.clone(), frame.is_index, loc),
                    None => {
                        self.stack.pop();
                        continue;
                    }
                }
            };

            let url = match resolve_loc(&loc, &parent) {
                Ok(url) => url,
                Err(source) => {
                    tracing::warn!("Skipping invalid <loc> {:?} in {}: {}", loc, parent, source);
                    self.failures.push(SitemapFailure {
                        url: parent.to_string(),
                        error: SitemapError::InvalidLoc { loc, source },
                    });
                    continue;
                }
            };

            if !is_index {
                return Some(url);
            }

            self.descend(url).await;
        }
    }

    /// Branches that were skipped so far
    pub fn failures(&self) -> &[SitemapFailure] {
        &self.failures
    }

    /// Consumes the walker, returning the skipped branches
    pub fn into_failures(self) -> Vec<SitemapFailure> {
        self.failures
    }

    /// Number of sitemap documents successfully read so far
    pub fn sitemaps_visited(&self) -> usize {
        self.sitemaps_visited
    }

    /// Opens a child sitemap and pushes it onto the branch
    async fn descend(&mut self, url: Url) {
        if self.stack.iter().any(|frame| frame.url == url) {
            tracing::warn!("Sitemap cycle detected at {}, skipping", url);
            self.failures.push(SitemapFailure {
                url: url.to_string(),
                error: SitemapError::Cycle {
                    url: url.to_string(),
                },
            });
            return;
        }

        match self.load(url.clone()).await {
            Ok(frame) => self.stack.push(frame),
            Err(error) => {
                tracing::warn!("Skipping sitemap {}: {}", url, error);
                self.failures.push(SitemapFailure {
                    url: url.to_string(),
                    error,
                });
            }
        }
    }

    async fn load(&mut self, url: Url) -> Result<Frame, SitemapError> {
        tracing::debug!("Fetching sitemap: {}", url);
        let body = fetch_text(self.client, &url).await?;

        if let Some(root) = &self.mirror_root {
            save_sitemap(&url, root, &body);
        }

        let node = parse_sitemap(&body)?;
        tracing::debug!(
            "Sitemap {} is {} with {} entries",
            url,
            if node.is_index() { "an index" } else { "a leaf" },
            node.locs().len()
        );

        self.sitemaps_visited += 1;
        Ok(Frame::new(url, node))
    }
}

/// Writes a raw sitemap document into the mirror; failures are only logged
fn save_sitemap(url: &Url, root: &std::path::Path, body: &str) {
    let path = match sitemap_path(url, root) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("Not saving sitemap {}: {}", url, e);
            return;
        }
    };

    let written = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| std::fs::write(&path, body));

    if let Err(e) = written {
        tracing::warn!("Failed to save sitemap {} to {}: {}", url, path.display(), e);
    }
}
