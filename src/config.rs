use crate::ScrapeError;
use crate::filter::LinkFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Where extraction scripts are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    /// Run the JavaScript program inside the page via WebDriver `execute`
    #[default]
    Script,
    /// Pull the rendered page source and evaluate it with the in-process DOM engine
    Source,
}

/// CSS selectors used by the link enumerator and page extractor.
///
/// Defaults match the markup produced by Docusaurus sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selectors {
    /// Anchors in the navigation menu
    #[serde(default = "default_menu_link")]
    pub menu_link: String,

    /// Top-level article container
    #[serde(default = "default_article")]
    pub article: String,

    /// Page heading used as the record title
    #[serde(default = "default_title")]
    pub title: String,

    /// Breadcrumb list items
    #[serde(default = "default_breadcrumb")]
    pub breadcrumb: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            menu_link: default_menu_link(),
            article: default_article(),
            title: default_title(),
            breadcrumb: default_breadcrumb(),
        }
    }
}

/// Configuration for a documentation crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Seed page whose navigation menu lists the documentation pages
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// Directory receiving one JSON file per page
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Pause between two page visits, in milliseconds
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,

    /// User-agent sent with every navigation
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default)]
    pub extract_mode: ExtractMode,

    /// Quiet period (no new network resources) that counts as network idle
    #[serde(default = "default_network_idle_ms")]
    pub network_idle_ms: u64,

    /// Upper bound for a single navigation; `null` leaves it unbounded
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: Option<u64>,

    #[serde(default)]
    pub selectors: Selectors,

    /// Regex patterns a link URL must match (any of them) to be scraped
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns excluding a link URL (take precedence over includes)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            start_url: default_start_url(),
            out_dir: default_out_dir(),
            rate_limit_ms: default_rate_limit_ms(),
            user_agent: default_user_agent(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            extract_mode: ExtractMode::default(),
            network_idle_ms: default_network_idle_ms(),
            navigation_timeout_secs: default_navigation_timeout_secs(),
            selectors: Selectors::default(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl ScrapeConfig {
    /// Create a configuration with default values for the given seed URL
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScrapeError> {
        let path = path.as_ref();
        let io_err = |source| ScrapeError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(io_err)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ScrapeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply the `WEBDRIVER_URL` environment variable if it is set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    /// Checks everything that would otherwise only fail mid-crawl
    pub fn validate(&self) -> Result<(), ScrapeError> {
        Url::parse(&self.start_url).map_err(|source| ScrapeError::Url {
            url: self.start_url.clone(),
            source,
        })?;

        if self.user_agent.trim().is_empty() {
            return Err(ScrapeError::Config("user agent must not be empty".into()));
        }

        for selector in [
            &self.selectors.menu_link,
            &self.selectors.article,
            &self.selectors.title,
            &self.selectors.breadcrumb,
        ] {
            crate::extract::dom::parse_selector(selector)?;
        }

        self.link_filter()?;
        Ok(())
    }

    /// Builds the include/exclude filter applied to enumerated links
    pub fn link_filter(&self) -> Result<LinkFilter, ScrapeError> {
        LinkFilter::new(
            self.include_patterns.as_slice(),
            self.exclude_patterns.as_slice(),
        )
    }

    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }

    pub fn navigation_timeout(&self) -> Option<Duration> {
        self.navigation_timeout_secs.map(Duration::from_secs)
    }
}

fn default_start_url() -> String {
    "https://docs.crustdata.com/docs/intro/".to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("./docs")
}

fn default_rate_limit_ms() -> u64 {
    2000
}

fn default_user_agent() -> String {
    "DocsScraper/1.0 (Research Purpose)".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_network_idle_ms() -> u64 {
    500
}

fn default_navigation_timeout_secs() -> Option<u64> {
    Some(30)
}

fn default_menu_link() -> String {
    "a.menu__link".to_string()
}

fn default_article() -> String {
    "article".to_string()
}

fn default_title() -> String {
    "h1".to_string()
}

fn default_breadcrumb() -> String {
    "nav.breadcrumbs li".to_string()
}
