use crate::ScrapeError;
use crate::results::Link;
use regex::Regex;

/// Decides which enumerated menu links get visited.
///
/// Same-page anchors and empty URLs are always rejected. Beyond that, an
/// exclude pattern match rejects a link, and when include patterns exist at
/// least one of them must match.
#[derive(Debug, Default)]
pub struct LinkFilter {
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Create a new link filter from regex patterns
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, ScrapeError> {
        // Compile regex patterns
        let mut include_regexes = Vec::with_capacity(include.len());
        for pattern in include {
            include_regexes.push(Regex::new(pattern.as_ref())?);
        }

        let mut exclude_regexes = Vec::with_capacity(exclude.len());
        for pattern in exclude {
            exclude_regexes.push(Regex::new(pattern.as_ref())?);
        }

        Ok(Self {
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if a link should be scraped based on all filtering rules
    pub fn should_visit(&self, link: &Link) -> bool {
        if !link.is_crawlable() {
            return false;
        }

        // Exclusions take precedence
        if self.exclude_regexes.iter().any(|r| r.is_match(&link.url)) {
            return false;
        }

        self.include_regexes.is_empty()
            || self.include_regexes.iter().any(|r| r.is_match(&link.url))
    }

    /// Keeps the links that pass, preserving their order
    pub fn apply(&self, links: Vec<Link>) -> Vec<Link> {
        let total = links.len();
        let kept: Vec<Link> = links
            .into_iter()
            .filter(|link| {
                let keep = self.should_visit(link);
                if !keep {
                    ::log::debug!("Link filter rejected: {}", link.url);
                }
                keep
            })
            .collect();

        if kept.len() != total {
            ::log::debug!("Link filter kept {} of {} links", kept.len(), total);
        }
        kept
    }
}
