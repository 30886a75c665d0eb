//! Data models for discovered channels and scraped articles.
//!
//! - [`Channel`]: a YouTube channel as stored in the candidate and approved caches
//! - [`RecentVideo`]: one of a channel's latest uploads, captured at approval time
//! - [`Article`]: an entry scraped from the news aggregator
//!
//! Field names follow the on-disk JSON layout so caches written by earlier
//! runs deserialize unchanged.

use serde::{Deserialize, Serialize};

/// Subscriber count reported for channels that hide it.
pub const HIDDEN_SUBSCRIBERS: i64 = -1;

/// Lifecycle of a discovered channel.
///
/// Only `Pending → Approved` is ever performed. `Rejected` is accepted when
/// reading a cache but never produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A YouTube channel moving through discovery and approval.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Channel {
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub custom_url: String,
    pub thumbnail: String,
    /// Channel creation time, RFC 3339.
    pub published_at: String,
    /// [`HIDDEN_SUBSCRIBERS`] when the owner hides the count.
    pub subscriber_count: i64,
    pub video_count: u64,
    pub view_count: u64,
    /// Free-text keywords from the channel's branding settings.
    pub keywords: String,
    pub status: ChannelStatus,
    pub discovered_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub latest_videos: Vec<RecentVideo>,
}

impl Channel {
    pub fn subscribers_hidden(&self) -> bool {
        self.subscriber_count == HIDDEN_SUBSCRIBERS
    }

    pub fn is_pending(&self) -> bool {
        self.status == ChannelStatus::Pending
    }

    pub fn channel_url(&self) -> String {
        format!("https://www.youtube.com/channel/{}", self.channel_id)
    }

    /// Timestamp used to order published channels, newest first.
    pub fn sort_key(&self) -> &str {
        self.approved_at.as_deref().unwrap_or(&self.discovered_at)
    }
}

/// One recent upload of an approved channel.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RecentVideo {
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
    pub published_at: String,
}

impl RecentVideo {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }

    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.video_id)
    }
}

/// A news entry scraped from the aggregator page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// Hex SHA-256 of the normalized URL; see [`crate::news::article_id`].
    pub id: String,
    pub title: String,
    pub url: String,
    /// Source-site label as shown to readers.
    pub site: String,
    /// Stable key of the source site.
    pub site_key: String,
    /// Posting time exactly as the aggregator displays it.
    #[serde(default)]
    pub time_text: String,
    pub fetched_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_deserializes_legacy_cache_entry() {
        let json = r#"{
            "channel_id": "UC123",
            "title": "星野みらい",
            "description": "新人VTuberです",
            "thumbnail": "https://yt3.example/a.jpg",
            "published_at": "2026-09-01T00:00:00Z",
            "subscriber_count": -1,
            "video_count": 4,
            "keywords": "",
            "discovered_at": "2026-10-01T00:00:00+00:00",
            "status": "pending"
        }"#;

        let channel: Channel = serde_json::from_str(json).unwrap();
        assert_eq!(channel.channel_id, "UC123");
        assert!(channel.subscribers_hidden());
        assert!(channel.is_pending());
        assert!(channel.latest_videos.is_empty());
        assert_eq!(channel.introduction, None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ChannelStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
        let rejected: ChannelStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(rejected, ChannelStatus::Rejected);
    }

    #[test]
    fn test_sort_key_prefers_approval_time() {
        let mut channel = Channel {
            discovered_at: "2026-10-01T00:00:00Z".to_string(),
            ..Default::default()
        };
        assert_eq!(channel.sort_key(), "2026-10-01T00:00:00Z");
        channel.approved_at = Some("2026-10-05T00:00:00Z".to_string());
        assert_eq!(channel.sort_key(), "2026-10-05T00:00:00Z");
    }

    #[test]
    fn test_channel_and_video_urls() {
        let channel = Channel {
            channel_id: "UCabc".to_string(),
            ..Default::default()
        };
        assert_eq!(channel.channel_url(), "https://www.youtube.com/channel/UCabc");

        let video = RecentVideo {
            video_id: "xyz".to_string(),
            ..Default::default()
        };
        assert_eq!(video.watch_url(), "https://www.youtube.com/watch?v=xyz");
        assert_eq!(video.embed_url(), "https://www.youtube.com/embed/xyz");
    }
}
