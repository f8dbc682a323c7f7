use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Sitemap-Mirror
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Root sitemap (or sitemap index) to start from
    #[serde(rename = "sitemap-url")]
    pub sitemap_url: Option<String>,

    /// Root of the mirrored directory tree; cleared at the start of every run
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Also write every fetched sitemap document into the output tree
    #[serde(rename = "save-sitemaps")]
    pub save_sitemaps: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            sitemap_url: None,
            output_dir: PathBuf::from("crawled"),
            request_timeout: 30,
            save_sitemaps: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "sitemap-mirror".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where to write the markdown run report, if anywhere
    #[serde(rename = "report-path")]
    pub report_path: Option<PathBuf>,
}
