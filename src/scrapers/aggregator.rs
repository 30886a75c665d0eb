//! News aggregator scraper.
//!
//! The aggregator lists entries as the immediate children of one container
//! element. Each entry carries a source-site label, an anchor with the
//! article link and title, and an optional posting time:
//!
//! ```html
//! <ul class="entry-list">
//!   <li>
//!     <span class="entry-site">ホロライブ</span>
//!     <a class="entry-link" href="/go/123">新衣装お披露目配信が決定</a>
//!     <span class="entry-time">10/18 12:30</span>
//!   </li>
//! </ul>
//! ```
//!
//! Entries with an unknown or excluded label, or without a link or title, are
//! skipped individually. A page without the container yields nothing and a
//! warning that the upstream layout probably changed.

use crate::config::NewsConfig;
use crate::fetcher::Fetcher;
use crate::models::Article;
use crate::news::article_id;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Why an entry was not turned into an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingLabel,
    UnknownSite(String),
    ExcludedSite(String),
    MissingLink,
    MissingTitle,
    BadLink(String),
}

/// Articles found on one page plus the entries that were dropped.
#[derive(Debug, Default)]
pub struct Extraction {
    pub articles: Vec<Article>,
    pub skipped: Vec<SkipReason>,
    pub container_found: bool,
}

struct Selectors {
    container: Selector,
    label: Selector,
    link: Selector,
    time: Selector,
}

impl Selectors {
    fn from_config(config: &NewsConfig) -> Result<Self, String> {
        let parse = |s: &str| Selector::parse(s).map_err(|e| format!("invalid selector {s:?}: {e}"));
        Ok(Self {
            container: parse(&config.container_selector)?,
            label: parse(&config.label_selector)?,
            link: parse(&config.link_selector)?,
            time: parse(&config.time_selector)?,
        })
    }
}

fn clean_text(element: ElementRef<'_>) -> String {
    let text = element.text().collect::<Vec<_>>().join(" ");
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Extract articles from aggregator markup.
///
/// # Arguments
///
/// * `html` - The aggregator page.
/// * `page_url` - Base for resolving relative links.
/// * `config` - Selectors, label map and excluded labels.
/// * `now` - Stamped on each article as its fetch time.
///
/// # Returns
///
/// The articles in page order, the entries that were skipped and why, and
/// whether the container element was found at all.
#[instrument(level = "info", skip_all, fields(bytes = html.len()))]
pub fn extract_articles(
    html: &str,
    page_url: &Url,
    config: &NewsConfig,
    now: DateTime<Utc>,
) -> Extraction {
    let selectors = match Selectors::from_config(config) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Aggregator selectors are invalid");
            return Extraction::default();
        }
    };

    let document = Html::parse_document(html);
    let Some(container) = document.select(&selectors.container).next() else {
        warn!(
            selector = %config.container_selector,
            "Entry container not found; the aggregator layout has probably changed"
        );
        return Extraction::default();
    };

    let mut extraction = Extraction {
        container_found: true,
        ..Default::default()
    };
    let fetched_at = now.to_rfc3339();

    for entry in container.children().filter_map(ElementRef::wrap) {
        match extract_entry(entry, &selectors, page_url, config, &fetched_at) {
            Ok(article) => extraction.articles.push(article),
            Err(reason) => {
                debug!(?reason, "Skipping entry");
                extraction.skipped.push(reason);
            }
        }
    }

    info!(
        articles = extraction.articles.len(),
        skipped = extraction.skipped.len(),
        "Extracted aggregator entries"
    );
    extraction
}

fn extract_entry(
    entry: ElementRef<'_>,
    selectors: &Selectors,
    page_url: &Url,
    config: &NewsConfig,
    fetched_at: &str,
) -> Result<Article, SkipReason> {
    let label = entry
        .select(&selectors.label)
        .next()
        .map(clean_text)
        .filter(|l| !l.is_empty())
        .ok_or(SkipReason::MissingLabel)?;

    if config.excluded.iter().any(|e| e == &label) {
        return Err(SkipReason::ExcludedSite(label));
    }
    let site_key = config
        .sites
        .get(&label)
        .cloned()
        .ok_or_else(|| SkipReason::UnknownSite(label.clone()))?;

    let link = entry
        .select(&selectors.link)
        .next()
        .ok_or(SkipReason::MissingLink)?;
    let href = link
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(SkipReason::MissingLink)?;
    let url = page_url
        .join(href)
        .map_err(|_| SkipReason::BadLink(href.to_string()))?;
    let title = Some(clean_text(link))
        .filter(|t| !t.is_empty())
        .ok_or(SkipReason::MissingTitle)?;

    let time_text = entry
        .select(&selectors.time)
        .next()
        .map(clean_text)
        .unwrap_or_default();

    let url = url.to_string();
    Ok(Article {
        id: article_id(&url),
        title,
        url,
        site: label,
        site_key,
        time_text,
        fetched_at: fetched_at.to_string(),
    })
}

/// Fetch the aggregator page and extract its entries; fetch failures yield nothing.
#[instrument(level = "info", skip_all, fields(url = %config.source_url))]
pub async fn scrape(fetcher: &Fetcher, config: &NewsConfig, now: DateTime<Utc>) -> Extraction {
    let page_url = match Url::parse(&config.source_url) {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "Aggregator URL is invalid");
            return Extraction::default();
        }
    };

    match fetcher.get_text(page_url.as_str(), &[]).await {
        Ok(html) => extract_articles(&html, &page_url, config, now),
        Err(e) => {
            error!(error = %e, "Aggregator fetch failed; no new articles this run");
            Extraction::default()
        }
    }
}
