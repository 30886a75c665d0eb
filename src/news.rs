//! Article identity, the capped newest-first article cache, and the news run
//! that ties scrape, merge, save and render together.

use crate::config::NewsConfig;
use crate::fetcher::Fetcher;
use crate::models::Article;
use crate::outputs::writer;
use crate::scrapers::aggregator;
use crate::store;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Canonical form of an article URL: parsed, fragment removed.
///
/// Unparsable input is only trimmed.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => raw.trim().to_string(),
    }
}

/// Stable article id: hex SHA-256 of the normalized URL.
pub fn article_id(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_url(url).as_bytes());
    hex::encode(hasher.finalize())
}

/// Result of merging a scrape into the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merge {
    pub articles: Vec<Article>,
    /// How many fresh articles were not already cached.
    pub added: usize,
}

/// Prepend unseen `fresh` articles to `stored` and keep at most `max_items`.
///
/// Order inside each side is preserved; the oldest entries fall off the tail.
///
/// # Arguments
///
/// * `stored` - The cached articles, newest first.
/// * `fresh` - Articles from the latest scrape, in page order.
/// * `max_items` - Cap on the merged collection.
///
/// # Returns
///
/// The merged collection and how many fresh articles it gained.
pub fn merge_articles(stored: Vec<Article>, fresh: Vec<Article>, max_items: usize) -> Merge {
    let mut seen: HashSet<String> = stored.iter().map(|a| a.id.clone()).collect();
    let new_articles: Vec<Article> = fresh
        .into_iter()
        .filter(|a| seen.insert(a.id.clone()))
        .collect();
    let added = new_articles.len();

    let mut articles = new_articles;
    articles.extend(stored);
    if articles.len() > max_items {
        debug!(dropped = articles.len() - max_items, "Evicting oldest articles");
        articles.truncate(max_items);
    }

    Merge { articles, added }
}

/// Scrape the aggregator, merge into the cache, save it and rebuild the site.
///
/// A failed or empty scrape is not an error: the stored articles are written
/// back unchanged and the site is rendered from them.
///
/// # Arguments
///
/// * `fetcher` - Shared HTTP client used for the aggregator page.
/// * `config` - Aggregator selectors, cache location and news site metadata.
/// * `now` - Fetch time stamped on new articles and shown in the footer.
///
/// # Returns
///
/// The merge that was persisted and rendered.
#[instrument(level = "info", skip_all, fields(source = %config.source_url))]
pub async fn run(
    fetcher: &Fetcher,
    config: &NewsConfig,
    now: DateTime<Utc>,
) -> Result<Merge, Box<dyn Error>> {
    let stored: Vec<Article> = store::load_collection(&config.cache_file).await;
    let stored_count = stored.len();

    let extraction = aggregator::scrape(fetcher, config, now).await;
    if !extraction.container_found {
        warn!(cached = stored_count, "No fresh articles; rendering from cache");
    }

    let merge = merge_articles(stored, extraction.articles, config.max_items);
    info!(
        added = merge.added,
        total = merge.articles.len(),
        skipped = extraction.skipped.len(),
        "Merged articles"
    );

    store::save_collection(&config.cache_file, &merge.articles).await?;
    writer::write_news_site(&merge.articles, config, now).await?;
    Ok(merge)
}
