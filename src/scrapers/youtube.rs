//! YouTube Data API v3 client.
//!
//! Three calls are used:
//!
//! | Call | Endpoint | Quota cost |
//! |------|----------|------------|
//! | [`YouTubeClient::search_channels`] | `search?type=channel` | 100 |
//! | [`YouTubeClient::channel_details`] | `channels` (≤ 50 ids per request) | 1 per batch |
//! | [`YouTubeClient::latest_videos`] | `search?type=video&channelId=…` | 100 |
//!
//! Responses are decoded into lenient serde models: every optional field
//! defaults, so one sparse item never sinks a batch. Any fetch failure is
//! logged and turns into an empty result.

use crate::config::{Config, DiscoveryConfig};
use crate::fetcher::{FetchError, Fetcher};
use crate::models::{Channel, ChannelStatus, HIDDEN_SUBSCRIBERS, RecentVideo};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

/// Maximum ids accepted by one `channels` request.
pub const DETAIL_BATCH_SIZE: usize = 50;

/// A channel as it appears in search results, before details are fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub published_at: String,
}

/// Source of channel search results and channel metadata.
pub trait ChannelDirectory {
    async fn search_channels(&self, query: &str, published_after: DateTime<Utc>) -> Vec<SearchHit>;
    async fn channel_details(&self, channel_ids: &[String]) -> Vec<Channel>;
}

/// Source of a channel's most recent uploads.
pub trait VideoSource {
    async fn latest_videos(&self, channel_id: &str) -> Vec<RecentVideo>;
}

// ---- wire models ----

#[derive(Debug, Default, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thumbnails {
    pub default: Thumbnail,
    pub medium: Thumbnail,
    pub high: Thumbnail,
}

impl Thumbnails {
    fn best(&self) -> String {
        [&self.medium.url, &self.high.url, &self.default.url]
            .into_iter()
            .find(|u| !u.is_empty())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchItem {
    pub id: SearchId,
    pub snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchId {
    pub kind: String,
    pub channel_id: String,
    pub video_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snippet {
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub custom_url: String,
    pub thumbnails: Thumbnails,
    pub published_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChannelItem {
    pub id: String,
    pub snippet: Snippet,
    pub statistics: Statistics,
    pub branding_settings: BrandingSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Statistics {
    #[serde(deserialize_with = "lenient_count")]
    pub subscriber_count: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub video_count: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub view_count: u64,
    pub hidden_subscriber_count: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BrandingSettings {
    pub channel: BrandingChannel,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BrandingChannel {
    pub keywords: String,
}

/// Counts arrive as decimal strings; numbers and junk are tolerated (junk → 0).
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s.trim().parse().unwrap_or(0),
        Value::Number(n) => n.as_u64().unwrap_or(0),
        _ => 0,
    })
}

// ---- extraction ----

/// Normalize a `search?type=channel` response. Items without a channel id are dropped.
pub fn extract_search_hits(response: ListResponse<SearchItem>) -> Vec<SearchHit> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let channel_id = if item.snippet.channel_id.is_empty() {
                item.id.channel_id
            } else {
                item.snippet.channel_id
            };
            if channel_id.is_empty() {
                warn!(title = %item.snippet.title, "Search item without channel id; skipping");
                return None;
            }
            Some(SearchHit {
                channel_id,
                thumbnail: item.snippet.thumbnails.best(),
                title: item.snippet.title,
                description: item.snippet.description,
                published_at: item.snippet.published_at,
            })
        })
        .collect()
}

/// Normalize a `channels` response into fresh pending candidates.
pub fn extract_channels(response: ListResponse<ChannelItem>, now: DateTime<Utc>) -> Vec<Channel> {
    response
        .items
        .into_iter()
        .filter(|item| !item.id.is_empty())
        .map(|item| {
            let subscriber_count = if item.statistics.hidden_subscriber_count {
                HIDDEN_SUBSCRIBERS
            } else {
                i64::try_from(item.statistics.subscriber_count).unwrap_or(i64::MAX)
            };
            Channel {
                channel_id: item.id,
                thumbnail: item.snippet.thumbnails.best(),
                title: item.snippet.title,
                description: item.snippet.description,
                custom_url: item.snippet.custom_url,
                published_at: item.snippet.published_at,
                subscriber_count,
                video_count: item.statistics.video_count,
                view_count: item.statistics.view_count,
                keywords: item.branding_settings.channel.keywords,
                status: ChannelStatus::Pending,
                discovered_at: now.to_rfc3339(),
                ..Default::default()
            }
        })
        .collect()
}

/// Normalize a `search?type=video` response. Items without a video id are dropped.
pub fn extract_videos(response: ListResponse<SearchItem>) -> Vec<RecentVideo> {
    response
        .items
        .into_iter()
        .filter(|item| !item.id.video_id.is_empty())
        .map(|item| RecentVideo {
            video_id: item.id.video_id,
            thumbnail: item.snippet.thumbnails.best(),
            title: item.snippet.title,
            published_at: item.snippet.published_at,
        })
        .collect()
}

// ---- client ----

/// Keyed client for the YouTube Data API.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    fetcher: Fetcher,
    api_base: String,
    api_key: String,
    results_per_query: u32,
    latest_videos: u32,
}

impl YouTubeClient {
    pub fn new(fetcher: Fetcher, config: &Config, api_key: String) -> Self {
        let DiscoveryConfig {
            api_base,
            results_per_query,
            latest_videos,
            ..
        } = &config.discovery;
        Self {
            fetcher,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            results_per_query: *results_per_query,
            latest_videos: *latest_videos,
        }
    }

    async fn list<T>(&self, endpoint: &str, mut params: Vec<(&str, String)>) -> Option<ListResponse<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        params.push(("key", self.api_key.clone()));
        let url = format!("{}/{}", self.api_base, endpoint);
        match self.fetcher.get_json::<ListResponse<T>>(&url, &params).await {
            Ok(response) => Some(response),
            Err(e) => {
                report_failure(endpoint, &e);
                None
            }
        }
    }
}

fn report_failure(endpoint: &str, e: &FetchError) {
    if e.is_quota() {
        error!(endpoint, error = %e, "YouTube API rejected the request (quota exhausted or key invalid)");
    } else {
        error!(endpoint, error = %e, "YouTube API request failed; continuing without data");
    }
}

impl ChannelDirectory for YouTubeClient {
    #[instrument(level = "info", skip(self, published_after))]
    async fn search_channels(&self, query: &str, published_after: DateTime<Utc>) -> Vec<SearchHit> {
        let params = vec![
            ("part", "snippet".to_string()),
            ("q", query.to_string()),
            ("type", "channel".to_string()),
            ("maxResults", self.results_per_query.to_string()),
            (
                "publishedAfter",
                published_after.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            ),
            ("order", "date".to_string()),
            ("regionCode", "JP".to_string()),
            ("relevanceLanguage", "ja".to_string()),
        ];
        let hits = self
            .list::<SearchItem>("search", params)
            .await
            .map(extract_search_hits)
            .unwrap_or_default();
        info!(count = hits.len(), "Search hits");
        hits
    }

    #[instrument(level = "info", skip_all, fields(ids = channel_ids.len()))]
    async fn channel_details(&self, channel_ids: &[String]) -> Vec<Channel> {
        let now = Utc::now();
        let batches: Vec<Vec<Channel>> = stream::iter(channel_ids.chunks(DETAIL_BATCH_SIZE))
            .then(|batch| async move {
                let params = vec![
                    ("part", "snippet,statistics,brandingSettings".to_string()),
                    ("id", batch.join(",")),
                ];
                let channels = self
                    .list::<ChannelItem>("channels", params)
                    .await
                    .map(|r| extract_channels(r, now))
                    .unwrap_or_default();
                debug!(requested = batch.len(), received = channels.len(), "Channel detail batch");
                channels
            })
            .collect()
            .await;

        let channels: Vec<Channel> = batches.into_iter().flatten().collect();
        info!(count = channels.len(), "Fetched channel details");
        channels
    }
}

impl VideoSource for YouTubeClient {
    #[instrument(level = "info", skip(self))]
    async fn latest_videos(&self, channel_id: &str) -> Vec<RecentVideo> {
        let params = vec![
            ("part", "snippet".to_string()),
            ("channelId", channel_id.to_string()),
            ("type", "video".to_string()),
            ("maxResults", self.latest_videos.to_string()),
            ("order", "date".to_string()),
        ];
        self.list::<SearchItem>("search", params)
            .await
            .map(extract_videos)
            .unwrap_or_default()
    }
}
