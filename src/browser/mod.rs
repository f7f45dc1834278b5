//! The browser is the only window into a page's DOM. The crawl driver sees it
//! through [`Browser`]: navigate, evaluate an extraction [`Script`], close.

pub mod webdriver;

#[cfg(test)]
pub(crate) mod fixture;

use crate::ScrapeError;
use crate::extract::Script;
use serde_json::Value;

/// A single browser page, reused serially for every navigation
#[allow(async_fn_in_trait)]
pub trait Browser {
    /// Navigate to `url` and return once the page is loaded and the network is idle
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// Run `script` against the currently loaded page
    async fn evaluate(&mut self, script: &Script) -> Result<Value, ScrapeError>;

    /// End the browser session
    async fn close(self) -> Result<(), ScrapeError>
    where
        Self: Sized;
}
