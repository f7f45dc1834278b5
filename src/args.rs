use clap::{Parser, ValueEnum};
use docs_scraper::config::{ExtractMode, ScrapeConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docs-scraper")]
#[command(about = "Scrapes a documentation site's pages into one JSON file each")]
#[command(version)]
pub struct Args {
    /// JSON configuration file; built-in defaults are used without it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed page whose navigation menu lists the pages to scrape
    #[arg(short, long)]
    pub url: Option<String>,

    /// Output directory for the JSON records
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Delay between page visits in milliseconds
    #[arg(short, long)]
    pub rate_limit: Option<u64>,

    /// User-agent string sent by the browser
    #[arg(long)]
    pub user_agent: Option<String>,

    /// WebDriver server URL (also read from WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Where extraction runs
    #[arg(short, long, value_enum)]
    pub extract_mode: Option<ExtractModeArg>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExtractModeArg {
    /// JavaScript inside the page
    Script,
    /// Rendered page source parsed locally
    Source,
}

/// Convert from CLI argument extract mode to the configuration one
pub fn convert_extract_mode(arg: ExtractModeArg) -> ExtractMode {
    match arg {
        ExtractModeArg::Script => ExtractMode::Script,
        ExtractModeArg::Source => ExtractMode::Source,
    }
}

impl Args {
    /// Builds the crawl configuration: file (or defaults), then environment, then flags
    pub fn into_config(self) -> Result<ScrapeConfig, docs_scraper::ScrapeError> {
        let mut config = match &self.config {
            Some(path) => ScrapeConfig::from_file(path)?,
            None => ScrapeConfig::default(),
        }
        .with_env_overrides();

        if let Some(url) = self.url {
            config.start_url = url;
        }
        if let Some(out_dir) = self.out_dir {
            config.out_dir = out_dir;
        }
        if let Some(rate_limit) = self.rate_limit {
            config.rate_limit_ms = rate_limit;
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }
        if let Some(webdriver_url) = self.webdriver_url {
            config.webdriver_url = webdriver_url;
        }
        if let Some(mode) = self.extract_mode {
            config.extract_mode = convert_extract_mode(mode);
        }
        if self.headed {
            config.headless = false;
        }

        Ok(config)
    }
}
