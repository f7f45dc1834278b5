use crate::ScrapeError;
use crate::browser::Browser;
use crate::config::{ExtractMode, ScrapeConfig};
use crate::extract::{Script, dom};
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// How often the page is polled while waiting for network idle
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Well-known local WebDriver endpoints tried when the configured one is down
const FALLBACK_WEBDRIVER_URLS: [&str; 2] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// A browser session driven over the WebDriver protocol
pub struct WebDriverBrowser {
    client: Client,
    mode: ExtractMode,
    network_idle: Duration,
    navigation_timeout: Option<Duration>,
}

impl WebDriverBrowser {
    /// Opens one session with the configured user agent and window mode
    pub async fn launch(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let client =
            connect_to_webdriver(&config.webdriver_url, session_capabilities(config)).await?;
        ::log::info!("Browser session started (user agent: {})", config.user_agent);

        Ok(Self {
            client,
            mode: config.extract_mode,
            network_idle: config.network_idle(),
            navigation_timeout: config.navigation_timeout(),
        })
    }

    async fn navigate(&self, url: &str) -> Result<(), ScrapeError> {
        self.client.goto(url).await?;
        self.wait_for_network_idle(url).await
    }

    /// Waits until the document has loaded and no new resource entries
    /// appeared for the idle window, giving up at the navigation timeout
    async fn wait_for_network_idle(&self, url: &str) -> Result<(), ScrapeError> {
        let script = Script::NetworkActivity;
        let started = Instant::now();
        let mut watch = IdleWatch::new(
            self.network_idle,
            self.navigation_timeout.map(|limit| started + limit),
            started,
        );

        loop {
            let value = self.client.execute(script.source(), script.args()).await?;
            let (ready_state, count): (String, u64) = serde_json::from_value(value)?;

            match watch.observe(&ready_state, count, Instant::now()) {
                IdleState::Busy => {}
                IdleState::Idle => {
                    ::log::trace!("Network idle with {} resources loaded", count);
                    return Ok(());
                }
                IdleState::Expired => {
                    return Err(ScrapeError::NavigationTimeout {
                        url: url.to_string(),
                        secs: started.elapsed().as_secs(),
                    });
                }
            }

            tokio::time::sleep(IDLE_POLL).await;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdleState {
    Busy,
    Idle,
    Expired,
}

/// Tracks successive `[readyState, resourceCount]` samples of a page
#[derive(Debug)]
struct IdleWatch {
    quiet: Duration,
    deadline: Option<Instant>,
    last_count: Option<u64>,
    quiet_since: Instant,
}

impl IdleWatch {
    fn new(quiet: Duration, deadline: Option<Instant>, now: Instant) -> Self {
        Self {
            quiet,
            deadline,
            last_count: None,
            quiet_since: now,
        }
    }

    fn observe(&mut self, ready_state: &str, count: u64, now: Instant) -> IdleState {
        if ready_state != "complete" || self.last_count != Some(count) {
            self.last_count = Some(count);
            self.quiet_since = now;
        } else if now.duration_since(self.quiet_since) >= self.quiet {
            return IdleState::Idle;
        }

        match self.deadline {
            Some(deadline) if now >= deadline => IdleState::Expired,
            _ => IdleState::Busy,
        }
    }
}

impl Browser for WebDriverBrowser {
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError> {
        ::log::debug!("GOTO: {}", url);

        match self.navigation_timeout {
            Some(limit) => timeout(limit, self.navigate(url))
                .await
                .map_err(|_| ScrapeError::NavigationTimeout {
                    url: url.to_string(),
                    secs: limit.as_secs(),
                })?,
            None => self.navigate(url).await,
        }
    }

    async fn evaluate(&mut self, script: &Script) -> Result<Value, ScrapeError> {
        match self.mode {
            ExtractMode::Script => Ok(self.client.execute(script.source(), script.args()).await?),
            ExtractMode::Source => {
                let html = self.client.source().await?;
                let location = self.client.current_url().await?;
                dom::evaluate(script, &html, &location)
            }
        }
    }

    async fn close(self) -> Result<(), ScrapeError> {
        self.client.close().await?;
        ::log::debug!("Browser session closed");
        Ok(())
    }
}

/// Session capabilities for Chrome and Firefox drivers alike
fn session_capabilities(config: &ScrapeConfig) -> Map<String, Value> {
    let mut chrome_args = vec![format!("--user-agent={}", config.user_agent)];
    let mut firefox_args = Vec::new();
    if config.headless {
        chrome_args.push("--headless=new".to_string());
        chrome_args.push("--disable-gpu".to_string());
        firefox_args.push("-headless".to_string());
    }

    let mut caps = Map::new();
    caps.insert("pageLoadStrategy".to_string(), json!("normal"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": chrome_args }));
    caps.insert(
        "moz:firefoxOptions".to_string(),
        json!({
            "args": firefox_args,
            "prefs": { "general.useragent.override": config.user_agent },
        }),
    );
    caps
}

/// Connects to the WebDriver instance, trying common local endpoints if the
/// configured one is unreachable
async fn connect_to_webdriver(
    webdriver_url: &str,
    caps: Map<String, Value>,
) -> Result<Client, ScrapeError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(caps);

    let mut last_error = match builder.connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::warn!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            ScrapeError::Connect {
                url: webdriver_url.to_string(),
                message: e.to_string(),
            }
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS {
        if url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        match builder.connect(url).await {
            Ok(client) => {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
            Err(e) => {
                last_error = ScrapeError::Connect {
                    url: url.to_string(),
                    message: e.to_string(),
                };
            }
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(last_error)
}
