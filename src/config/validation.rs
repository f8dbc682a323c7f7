use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::crawler::check_clearable;
use crate::ConfigError;
use url::Url;

/// Upper bound for `request-timeout`, in seconds
const MAX_REQUEST_TIMEOUT: u64 = 600;

/// Validates the entire configuration
///
/// A missing `sitemap-url` is not an error here because it may still be
/// supplied on the command line; see [`Config::root_sitemap`].
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

impl Config {
    /// Returns the parsed root sitemap URL
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - The configured HTTP(S) sitemap URL
    /// * `Err(ConfigError)` - No sitemap URL was configured, or it is invalid
    pub fn root_sitemap(&self) -> Result<Url, ConfigError> {
        let raw = self.crawler.sitemap_url.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "sitemap-url is required (set it in the config file or pass --sitemap)"
                    .to_string(),
            )
        })?;
        parse_sitemap_url(raw)
    }
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if let Some(raw) = &config.sitemap_url {
        parse_sitemap_url(raw)?;
    }

    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output-dir cannot be empty".to_string(),
        ));
    }

    // The output dir is wiped on every run
    check_clearable(&config.output_dir)
        .map_err(|e| ConfigError::Validation(format!("Unsafe output-dir: {}", e)))?;

    if config.request_timeout < 1 || config.request_timeout > MAX_REQUEST_TIMEOUT {
        return Err(ConfigError::Validation(format!(
            "request-timeout must be between 1 and {} seconds, got {}",
            MAX_REQUEST_TIMEOUT, config.request_timeout
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.report_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "report-path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

fn parse_sitemap_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid sitemap-url '{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "sitemap-url '{}' must use HTTP or HTTPS",
            raw
        )));
    }

    Ok(url)
}
