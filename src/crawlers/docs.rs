use crate::ScrapeError;
use crate::browser::Browser;
use crate::config::ScrapeConfig;
use crate::extract;
use crate::filter::LinkFilter;
use crate::results::{CrawlReport, Link, LinkOutcome};
use crate::storage;
use crate::utils::FilenameRegistry;
use std::future::Future;

/// Crawls the documentation site described by `config`.
///
/// Prepares the output directory, obtains a browser from `launch`, loads the
/// seed page and lists its menu links, then visits each link once, in order,
/// pausing `rate_limit_ms` after every visit. A link that fails is logged and
/// recorded in the report; the crawl carries on with the next one.
///
/// Errors before the first link is visited (directory, launch, seed page,
/// link discovery) abort the crawl.
pub async fn crawl<B, F, Fut>(config: &ScrapeConfig, launch: F) -> Result<CrawlReport, ScrapeError>
where
    B: Browser,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<B, ScrapeError>>,
{
    storage::ensure_dir(&config.out_dir).await?;
    let filter = config.link_filter()?;

    let mut browser = launch().await?;

    let links = match discover_links(&mut browser, config, &filter).await {
        Ok(links) => links,
        Err(e) => {
            shutdown(browser).await;
            return Err(e);
        }
    };

    let total = links.len();
    let mut report = CrawlReport::default();
    let mut filenames = FilenameRegistry::new();

    for (index, link) in links.into_iter().enumerate() {
        ::log::info!("Scraping {}/{}: {}", index + 1, total, link.text);

        let outcome = match visit(&mut browser, config, &link, &mut filenames).await {
            Ok(outcome) => outcome,
            Err(e) => {
                ::log::error!("Error scraping {}: {}", link.url, e);
                LinkOutcome::Failed {
                    reason: e.to_string(),
                    link,
                }
            }
        };
        report.outcomes.push(outcome);

        tokio::time::sleep(config.rate_limit()).await;
    }

    shutdown(browser).await;

    ::log::info!(
        "Scraping completed! {} saved, {} without article, {} failed",
        report.saved(),
        report.without_article(),
        report.failed()
    );
    Ok(report)
}

/// Loads the seed page and returns the menu links worth visiting
async fn discover_links<B: Browser>(
    browser: &mut B,
    config: &ScrapeConfig,
    filter: &LinkFilter,
) -> Result<Vec<Link>, ScrapeError> {
    browser.goto(&config.start_url).await?;
    ::log::info!("Started scraping from: {}", config.start_url);

    let links = filter.apply(extract::enumerate_links(browser, &config.selectors).await?);
    ::log::info!("Found {} documentation pages", links.len());
    Ok(links)
}

/// Navigate, extract and persist a single link
async fn visit<B: Browser>(
    browser: &mut B,
    config: &ScrapeConfig,
    link: &Link,
    filenames: &mut FilenameRegistry,
) -> Result<LinkOutcome, ScrapeError> {
    browser.goto(&link.url).await?;

    let Some(record) = extract::extract_page(browser, &config.selectors).await? else {
        ::log::warn!("No article found at {}, nothing written", link.url);
        return Ok(LinkOutcome::NoArticle { link: link.clone() });
    };

    let filename = filenames.filename_for(link);
    let path = storage::write_record(&config.out_dir, &filename, &record).await?;
    filenames.claim(&filename, link);
    ::log::info!("Saved \"{}\" to {}", record.metadata.title, path.display());

    Ok(LinkOutcome::Saved {
        link: link.clone(),
        path,
        title: record.metadata.title,
    })
}

async fn shutdown<B: Browser>(browser: B) {
    if let Err(e) = browser.close().await {
        ::log::warn!("Failed to close browser: {}", e);
    }
}
