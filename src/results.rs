use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A documentation link found in the navigation menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute URL of the page
    pub url: String,

    /// Display text of the menu entry (may be empty)
    #[serde(default)]
    pub text: String,
}

impl Link {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }

    /// Same-page anchors and empty URLs are never visited
    pub fn is_crawlable(&self) -> bool {
        !self.url.is_empty() && !self.url.contains('#')
    }
}

/// Metadata stored alongside the article markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub url: String,
    /// ISO-8601 extraction time
    pub timestamp: String,
    #[serde(default)]
    pub breadcrumbs: Vec<String>,
}

/// Extracted content of one documentation page, written once to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Inner markup of the article container, verbatim
    pub content: String,
    pub metadata: PageMetadata,
}

/// What happened to a single link during the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Record written to `path`
    Saved {
        link: Link,
        path: PathBuf,
        title: String,
    },
    /// Page loaded but had no article container
    NoArticle { link: Link },
    /// Navigation, extraction or write failed
    Failed { link: Link, reason: String },
}

impl LinkOutcome {
    pub fn link(&self) -> &Link {
        match self {
            LinkOutcome::Saved { link, .. }
            | LinkOutcome::NoArticle { link }
            | LinkOutcome::Failed { link, .. } => link,
        }
    }
}

/// Ordered outcomes of every discovered link
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub outcomes: Vec<LinkOutcome>,
}

impl CrawlReport {
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::Saved { .. }))
    }

    pub fn without_article(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::NoArticle { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::Failed { .. }))
    }

    /// Links that could not be scraped, with the reason, in crawl order
    pub fn failures(&self) -> impl Iterator<Item = (&Link, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            LinkOutcome::Failed { reason, .. } => Some((outcome.link(), reason.as_str())),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&LinkOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}
