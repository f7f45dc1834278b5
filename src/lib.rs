//! Documentation-site scraper.
//!
//! Drives a headless browser through a WebDriver server, walks the navigation
//! menu of a seed page and writes one JSON record per documentation page.

pub mod browser;
pub mod config;
pub mod crawlers;
pub mod extract;
pub mod filter;
pub mod logging;
pub mod results;
pub mod storage;
pub mod utils;

// Re-export commonly used types for convenience
pub use browser::Browser;
pub use config::ScrapeConfig;
pub use results::{CrawlReport, Link, LinkOutcome, PageMetadata, PageRecord};

use std::path::PathBuf;
use thiserror::Error;

/// Error type for every scraper operation
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to connect to any WebDriver server (last tried {url}): {message}")]
    Connect { url: String, message: String },

    #[error("Browser command failed: {0}")]
    Browser(#[from] fantoccini::error::CmdError),

    #[error("Navigation to {url} timed out after {secs}s")]
    NavigationTimeout { url: String, secs: u64 },

    #[error("Invalid URL {url}: {source}")]
    Url {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid URL pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runs a full crawl against a real browser: prepares the output directory,
/// launches a WebDriver session and hands it to the crawl driver.
pub async fn run(config: &ScrapeConfig) -> Result<CrawlReport, ScrapeError> {
    config.validate()?;
    crawlers::docs::crawl(config, || browser::webdriver::WebDriverBrowser::launch(config)).await
}
