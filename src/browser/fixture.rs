use crate::ScrapeError;
use crate::browser::Browser;
use crate::extract::{Script, dom};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use url::Url;

const NOT_FOUND: &str = "<html><body><h1>Page Not Found</h1></body></html>";

/// What a fixture browser went through, shared with the test after `close`
#[derive(Debug, Default)]
pub(crate) struct FixtureLog {
    pub visited: Vec<String>,
    pub closed: bool,
}

/// In-memory browser serving fixed HTML per URL, evaluated with the DOM engine
#[derive(Debug, Default)]
pub(crate) struct FixtureBrowser {
    pages: HashMap<String, String>,
    unreachable: HashSet<String>,
    broken: HashSet<String>,
    location: Option<Url>,
    log: Arc<Mutex<FixtureLog>>,
}

impl FixtureBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// Navigation to `url` fails
    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.insert(url.to_string());
        self
    }

    /// Navigation to `url` succeeds but every script evaluated there fails
    pub fn broken(mut self, url: &str) -> Self {
        self.broken.insert(url.to_string());
        self
    }

    pub fn log(&self) -> Arc<Mutex<FixtureLog>> {
        Arc::clone(&self.log)
    }
}

impl Browser for FixtureBrowser {
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.log.lock().unwrap().visited.push(url.to_string());

        if self.unreachable.contains(url) {
            return Err(ScrapeError::NavigationTimeout {
                url: url.to_string(),
                secs: 30,
            });
        }

        let location = Url::parse(url).map_err(|source| ScrapeError::Url {
            url: url.to_string(),
            source,
        })?;
        self.location = Some(location);
        Ok(())
    }

    async fn evaluate(&mut self, script: &Script) -> Result<Value, ScrapeError> {
        let location = self
            .location
            .clone()
            .unwrap_or_else(|| Url::parse("about:blank").unwrap());

        if self.broken.contains(location.as_str()) {
            return Err(serde_json::from_str::<Value>("{").unwrap_err().into());
        }

        let html = self
            .pages
            .get(location.as_str())
            .map(String::as_str)
            .unwrap_or(NOT_FOUND);
        dom::evaluate(script, html, &location)
    }

    async fn close(self) -> Result<(), ScrapeError> {
        self.log.lock().unwrap().closed = true;
        Ok(())
    }
}
