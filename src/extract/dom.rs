use crate::ScrapeError;
use crate::extract::Script;
use crate::results::{Link, PageMetadata, PageRecord};
use chrono::{SecondsFormat, Utc};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

/// Parses a CSS selector, keeping the failing selector in the error
pub fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Evaluates `script` against a rendered page source located at `location`.
///
/// Produces the same JSON the in-page JavaScript program would.
pub fn evaluate(script: &Script, html: &str, location: &Url) -> Result<Value, ScrapeError> {
    let doc = Html::parse_document(html);

    match script {
        Script::EnumerateLinks { menu_link } => {
            let links = enumerate_links(&doc, menu_link, location)?;
            Ok(serde_json::to_value(links)?)
        }
        Script::ExtractPage {
            article,
            title,
            breadcrumb,
        } => {
            let record = extract_page(&doc, article, title, breadcrumb, location)?;
            Ok(serde_json::to_value(record)?)
        }
        // A static document has nothing left in flight
        Script::NetworkActivity => Ok(serde_json::json!(["complete", 0])),
    }
}

fn enumerate_links(doc: &Html, menu_link: &str, location: &Url) -> Result<Vec<Link>, ScrapeError> {
    let selector = parse_selector(menu_link)?;
    let base = document_base(doc, location);

    let links = doc
        .select(&selector)
        .map(|anchor| Link {
            url: resolve_href(&anchor, &base),
            text: text_content(&anchor).trim().to_string(),
        })
        .filter(Link::is_crawlable)
        .collect::<Vec<_>>();

    ::log::debug!("DOM engine found {} menu links", links.len());
    Ok(links)
}

fn extract_page(
    doc: &Html,
    article: &str,
    title: &str,
    breadcrumb: &str,
    location: &Url,
) -> Result<Option<PageRecord>, ScrapeError> {
    let article_selector = parse_selector(article)?;
    let Some(container) = doc.select(&article_selector).next() else {
        return Ok(None);
    };

    let title_selector = parse_selector(title)?;
    let breadcrumb_selector = parse_selector(breadcrumb)?;

    let title = doc
        .select(&title_selector)
        .next()
        .map(|heading| text_content(&heading))
        .unwrap_or_default();

    let breadcrumbs = doc
        .select(&breadcrumb_selector)
        .map(|item| text_content(&item))
        .collect();

    Ok(Some(PageRecord {
        content: container.inner_html(),
        metadata: PageMetadata {
            title,
            url: location.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            breadcrumbs,
        },
    }))
}

/// Base URL for relative hrefs: `<base href>` if present, else the location
fn document_base(doc: &Html, location: &Url) -> Url {
    let Ok(selector) = Selector::parse("base[href]") else {
        return location.clone();
    };

    doc.select(&selector)
        .next()
        .and_then(|base| base.value().attr("href"))
        .and_then(|href| location.join(href.trim()).ok())
        .unwrap_or_else(|| location.clone())
}

/// Mirrors `HTMLAnchorElement.href`: empty without an attribute, the raw value
/// if it cannot be resolved.
fn resolve_href(anchor: &ElementRef<'_>, base: &Url) -> String {
    match anchor.value().attr("href") {
        None => String::new(),
        Some(href) => base
            .join(href.trim())
            .map(String::from)
            .unwrap_or_else(|_| href.to_string()),
    }
}

fn text_content(element: &ElementRef<'_>) -> String {
    element.text().collect()
}
