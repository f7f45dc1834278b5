//! Extraction programs evaluated against the currently loaded page.
//!
//! A [`Script`] is plain data: it names the program and carries its selectors,
//! so it can be shipped into the page's own JavaScript context or evaluated
//! in-process by [`dom::evaluate`]. Both paths return the same JSON shape,
//! which is decoded here into typed results.

pub mod dom;

use crate::ScrapeError;
use crate::browser::Browser;
use crate::config::Selectors;
use crate::results::{Link, PageRecord};
use serde::Serialize;
use serde_json::Value;

/// An extraction program and its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Script {
    /// Navigation-menu links as `[{url, text}]`
    EnumerateLinks { menu_link: String },
    /// Article record as `{content, metadata}` or `null`
    ExtractPage {
        article: String,
        title: String,
        breadcrumb: String,
    },
    /// `[readyState, resourceCount]`, used to detect network idle
    NetworkActivity,
}

impl Script {
    pub fn enumerate_links(selectors: &Selectors) -> Self {
        Script::EnumerateLinks {
            menu_link: selectors.menu_link.clone(),
        }
    }

    pub fn extract_page(selectors: &Selectors) -> Self {
        Script::ExtractPage {
            article: selectors.article.clone(),
            title: selectors.title.clone(),
            breadcrumb: selectors.breadcrumb.clone(),
        }
    }

    /// JavaScript body run by the browser; arguments arrive in `arguments`
    pub fn source(&self) -> &'static str {
        match self {
            Script::EnumerateLinks { .. } => include_str!("scripts/links.js"),
            Script::ExtractPage { .. } => include_str!("scripts/page.js"),
            Script::NetworkActivity => include_str!("scripts/activity.js"),
        }
    }

    /// Positional arguments matching [`Script::source`]
    pub fn args(&self) -> Vec<Value> {
        match self {
            Script::EnumerateLinks { menu_link } => vec![Value::from(menu_link.as_str())],
            Script::ExtractPage {
                article,
                title,
                breadcrumb,
            } => vec![
                Value::from(article.as_str()),
                Value::from(title.as_str()),
                Value::from(breadcrumb.as_str()),
            ],
            Script::NetworkActivity => Vec::new(),
        }
    }
}

/// Lists the documentation links of the loaded page in document order.
///
/// Links with an empty URL or a fragment are dropped even if the evaluating
/// context let them through.
pub async fn enumerate_links<B: Browser>(
    browser: &mut B,
    selectors: &Selectors,
) -> Result<Vec<Link>, ScrapeError> {
    let value = browser.evaluate(&Script::enumerate_links(selectors)).await?;
    decode_links(value)
}

/// Extracts the article record of the loaded page, `None` if it has no
/// article container.
pub async fn extract_page<B: Browser>(
    browser: &mut B,
    selectors: &Selectors,
) -> Result<Option<PageRecord>, ScrapeError> {
    let value = browser.evaluate(&Script::extract_page(selectors)).await?;
    decode_page(value)
}

pub fn decode_links(value: Value) -> Result<Vec<Link>, ScrapeError> {
    // A context without any matches may hand back null rather than []
    if value.is_null() {
        return Ok(Vec::new());
    }
    let mut links: Vec<Link> = serde_json::from_value(value)?;
    links.retain(Link::is_crawlable);
    Ok(links)
}

pub fn decode_page(value: Value) -> Result<Option<PageRecord>, ScrapeError> {
    Ok(serde_json::from_value(value)?)
}
