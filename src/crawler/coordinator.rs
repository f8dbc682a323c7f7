//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties everything together:
//! - Resetting the output root
//! - Walking the sitemap tree
//! - Fetching, extracting and saving each page in turn
//! - Collecting the run report

use crate::config::Config;
use crate::crawler::{build_http_client, extract_main_content, fetch_text, prepare_output_dir};
use crate::output::{CrawlReport, PageFailure, PageOutcome, SavedPage};
use crate::sitemap::SitemapWalker;
use crate::url::page_path;
use crate::MirrorError;
use chrono::Utc;
use reqwest::Client;
use std::path::Path;
use url::Url;

/// How often (in pages) a progress line is logged
const PROGRESS_INTERVAL: usize = 25;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(MirrorError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, MirrorError> {
        let client = build_http_client(&config.crawler, &config.user_agent)?;
        Ok(Self { config, client })
    }

    /// Runs a crawl using the sitemap and output directory from the config
    pub async fn run(&self) -> Result<CrawlReport, MirrorError> {
        let root = self.config.root_sitemap()?;
        self.mirror(root, &self.config.crawler.output_dir).await
    }

    /// Mirrors every page reachable from `root_sitemap` into `output_root`
    ///
    /// Pages are processed strictly one after another. A page that cannot
    /// be fetched, mapped or written is recorded in the report and the
    /// crawl moves on; it leaves no file behind.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The crawl ran to the end of the sitemap tree
    /// * `Err(MirrorError::OutputPreparation)` - The output root could not be reset
    /// * `Err(MirrorError::RootSitemap)` - The root sitemap could not be read
    pub async fn mirror(
        &self,
        root_sitemap: Url,
        output_root: &Path,
    ) -> Result<CrawlReport, MirrorError> {
        let started_at = Utc::now();
        tracing::info!(
            "Mirroring {} into {}",
            root_sitemap,
            output_root.display()
        );

        prepare_output_dir(output_root).map_err(|source| MirrorError::OutputPreparation {
            path: output_root.to_path_buf(),
            source,
        })?;

        let mirror_root = self
            .config
            .crawler
            .save_sitemaps
            .then(|| output_root.to_path_buf());

        let mut walker = SitemapWalker::open(&self.client, root_sitemap.clone(), mirror_root)
            .await
            .map_err(|source| MirrorError::RootSitemap {
                url: root_sitemap.to_string(),
                source,
            })?;

        let mut pages = Vec::new();
        while let Some(page) = walker.next_page().await {
            pages.push(self.process_page(page, output_root).await);

            if pages.len() % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {} pages processed, {} sitemaps read",
                    pages.len(),
                    walker.sitemaps_visited()
                );
            }
        }

        let sitemaps_visited = walker.sitemaps_visited();
        let report = CrawlReport {
            root_sitemap: root_sitemap.to_string(),
            output_root: output_root.to_path_buf(),
            started_at,
            finished_at: Utc::now(),
            sitemaps_visited,
            pages,
            sitemap_failures: walker.into_failures(),
        };

        tracing::info!(
            "Crawl completed: {} saved, {} failed, {} sitemaps skipped in {}s",
            report.pages_saved(),
            report.pages_failed(),
            report.sitemap_failures.len(),
            report.duration().num_seconds()
        );

        Ok(report)
    }

    /// Processes a single page URL, logging and recording the outcome
    async fn process_page(&self, page: Url, output_root: &Path) -> PageOutcome {
        let result = self.save_page(&page, output_root).await;

        match &result {
            Ok(saved) if !saved.main_content => {
                tracing::warn!("No <main> element in {}, wrote diagnostic", page);
            }
            Ok(saved) => {
                tracing::debug!("Saved {} to {}", page, saved.path.display());
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", page, e);
            }
        }

        PageOutcome {
            url: page.to_string(),
            result,
        }
    }

    /// Maps, fetches, extracts and writes one page
    async fn save_page(&self, page: &Url, output_root: &Path) -> Result<SavedPage, PageFailure> {
        let path = page_path(page, output_root)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PageFailure::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        tracing::info!("Fetching and saving: {}", page);
        let body = fetch_text(&self.client, page).await?;

        let (content, main_content) = match extract_main_content(&body) {
            Ok(fragment) => (fragment, true),
            Err(e) => (e.to_string(), false),
        };

        std::fs::write(&path, content).map_err(|source| PageFailure::Write {
            path: path.clone(),
            source,
        })?;

        Ok(SavedPage { path, main_content })
    }
}

/// Runs a complete crawl operation
///
/// # Example
///
/// ```no_run
/// use sitemap_mirror::config::load_config;
/// use sitemap_mirror::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("mirror.toml"))?;
/// let report = run_crawl(config).await?;
/// println!("{} pages saved", report.pages_saved());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, MirrorError> {
    Coordinator::new(config)?.run().await
}
