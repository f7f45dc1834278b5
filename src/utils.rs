use crate::results::Link;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::LazyLock;

static NON_ALNUM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("Slug regex should be valid"));

/// Convert display text to a filename stem.
///
/// Lower-cases the text, collapses every run of characters outside `[a-z0-9]`
/// into a single hyphen and strips hyphens at both ends.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// First 8 hex digits of the SHA-256 of a URL
pub fn short_hash(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex::encode(&digest[..4])
}

/// Filename stem for a link: slug of its text, else slug of its URL path,
/// else a hash of the URL.
pub fn file_stem(link: &Link) -> String {
    let from_text = slugify(&link.text);
    if !from_text.is_empty() {
        return from_text;
    }

    let from_path = url::Url::parse(&link.url)
        .map(|url| slugify(url.path()))
        .unwrap_or_else(|_| slugify(&link.url));
    if !from_path.is_empty() {
        return from_path;
    }

    format!("page-{}", short_hash(&link.url))
}

/// Tracks output filenames for one crawl.
///
/// A filename is bound to a URL only once its record is on disk. Another URL
/// with the same stem gets a suffix derived from its own URL.
#[derive(Debug, Default)]
pub struct FilenameRegistry {
    written: HashMap<String, String>,
}

impl FilenameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the `.json` filename to use for `link` without reserving it
    pub fn filename_for(&self, link: &Link) -> String {
        let stem = file_stem(link);
        let filename = format!("{}.json", stem);
        match self.written.get(&filename) {
            Some(owner) if owner != &link.url => {
                let disambiguated = format!("{}-{}.json", stem, short_hash(&link.url));
                ::log::warn!(
                    "Filename {} already used by {}, writing {} as {}",
                    filename,
                    owner,
                    link.url,
                    disambiguated
                );
                disambiguated
            }
            _ => filename,
        }
    }

    /// Binds `filename` to `link` after its record was written
    pub fn claim(&mut self, filename: &str, link: &Link) {
        self.written
            .entry(filename.to_string())
            .or_insert_with(|| link.url.clone());
    }
}
