//! Candidate collection: search, detail lookup, filtering and merge.
//!
//! Each configured query is searched once. Channels already known as
//! candidates or approved are ignored, the rest are looked up in detail,
//! passed through the [`FilterPolicy`], and the survivors are appended to the
//! candidate collection as `pending`.

use crate::approval::Ledger;
use crate::config::DiscoveryConfig;
use crate::filter::{FilterPolicy, Rejection, Verdict};
use crate::models::{Channel, ChannelStatus};
use crate::scrapers::youtube::{ChannelDirectory, SearchHit};
use crate::utils::format_subscriber_count;
use chrono::{DateTime, Duration, Utc};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument};

/// What one collection pass did.
#[derive(Debug, Default)]
pub struct CollectReport {
    pub queries: usize,
    pub hits: usize,
    /// Previously unseen channel ids that were looked up.
    pub looked_up: usize,
    pub accepted: Vec<Channel>,
    pub rejected: Vec<(String, Rejection)>,
}

/// Search every query and append the channels that pass the filter as pending.
///
/// # Arguments
///
/// * `directory` - Channel search and detail lookup.
/// * `config` - Queries and filter thresholds.
/// * `ledger` - Known candidates and approved channels; gains the new candidates.
/// * `now` - Filter reference time and the recorded discovery time.
///
/// # Returns
///
/// Counts for the pass plus the accepted channels and the rejection reasons.
#[instrument(level = "info", skip_all, fields(queries = config.queries.len()))]
pub async fn collect_candidates<D: ChannelDirectory>(
    directory: &D,
    config: &DiscoveryConfig,
    ledger: &mut Ledger,
    now: DateTime<Utc>,
) -> CollectReport {
    let mut report = CollectReport {
        queries: config.queries.len(),
        ..Default::default()
    };

    let mut known: HashSet<String> = ledger
        .candidates
        .iter()
        .chain(ledger.approved.iter())
        .map(|c| c.channel_id.clone())
        .collect();

    let published_after = now - Duration::days(config.max_channel_age_days);
    let mut hits: Vec<SearchHit> = Vec::new();
    for query in &config.queries {
        let found = directory.search_channels(query, published_after).await;
        info!(%query, count = found.len(), "Searched");
        report.hits += found.len();
        hits.extend(found);
    }

    let fresh: Vec<SearchHit> = hits
        .into_iter()
        .filter(|h| !known.contains(&h.channel_id))
        .unique_by(|h| h.channel_id.clone())
        .collect();

    if fresh.is_empty() {
        info!("No new candidates this run");
        return report;
    }

    let ids: Vec<String> = fresh.iter().map(|h| h.channel_id.clone()).collect();
    report.looked_up = ids.len();
    let snippets: HashMap<String, SearchHit> =
        fresh.into_iter().map(|h| (h.channel_id.clone(), h)).collect();

    let policy = FilterPolicy::from_config(config);
    for mut channel in directory.channel_details(&ids).await {
        if !known.insert(channel.channel_id.clone()) {
            continue;
        }
        // Sparse detail records borrow what the search snippet already had.
        if let Some(hit) = snippets.get(&channel.channel_id) {
            if channel.thumbnail.is_empty() {
                channel.thumbnail = hit.thumbnail.clone();
            }
            if channel.description.is_empty() {
                channel.description = hit.description.clone();
            }
            if channel.published_at.is_empty() {
                channel.published_at = hit.published_at.clone();
            }
        }

        match policy.evaluate(&channel, now) {
            Verdict::Pass => {
                info!(
                    title = %channel.title,
                    subscribers = %format_subscriber_count(channel.subscriber_count),
                    "Accepted candidate"
                );
                channel.status = ChannelStatus::Pending;
                channel.discovered_at = now.to_rfc3339();
                report.accepted.push(channel);
            }
            Verdict::Fail(reason) => {
                info!(title = %channel.title, %reason, "Rejected channel");
                report.rejected.push((channel.channel_id, reason));
            }
        }
    }

    ledger.candidates.extend(report.accepted.iter().cloned());
    info!(
        total = ledger.candidates.len(),
        new = report.accepted.len(),
        rejected = report.rejected.len(),
        "Merged candidates"
    );
    report
}
