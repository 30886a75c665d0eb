//! Runtime configuration.
//!
//! Every threshold, keyword list, path and piece of site metadata lives in a
//! [`Config`] value that is passed down to the components that need it. The
//! defaults reproduce the production site; a YAML file given with `--config`
//! can override any subset of fields.
//!
//! ```yaml
//! discovery:
//!   max_subscribers: 500
//! site:
//!   url: https://staging.vtuber-matome.net
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Top-level configuration for both pipelines.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub site: SiteConfig,
    pub paths: PathsConfig,
    pub fetch: FetchConfig,
    pub openai: OpenAiConfig,
    pub news: NewsConfig,
}

/// Search queries and filter thresholds for candidate discovery.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub api_base: String,
    pub queries: Vec<String>,
    /// Results requested per search query.
    pub results_per_query: u32,
    pub max_subscribers: i64,
    pub max_channel_age_days: i64,
    pub min_videos: u64,
    /// Case-insensitive substrings that mark a channel as VTuber-like.
    pub keywords: Vec<String>,
    /// Recent uploads fetched for a channel at approval time.
    pub latest_videos: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            queries: [
                "新人VTuber",
                "VTuberデビュー",
                "初配信 VTuber",
                "個人勢VTuber デビュー",
                "新人Vtuber 自己紹介",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            results_per_query: 10,
            max_subscribers: 1000,
            max_channel_age_days: 90,
            min_videos: 3,
            keywords: [
                "vtuber",
                "ブイチューバー",
                "Vチューバー",
                "バーチャル",
                "virtual",
                "ママ",
                "パパ",
                "Live2D",
                "live2d",
                "配信者",
                "ゲーム実況",
                "歌ってみた",
                "初配信",
                "デビュー",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            latest_videos: 5,
        }
    }
}

/// Metadata of the published discovery site.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub url: String,
    /// Written verbatim to `CNAME`.
    pub domain: String,
    pub contact_email: String,
    pub analytics_id: Option<String>,
    pub page_size: usize,
    pub feed_size: usize,
    /// An ad placeholder is inserted after every `ad_interval` cards; 0 disables it.
    pub ad_interval: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "新人VTuber発掘所".to_string(),
            tagline: "あなたの推しになる新人、ここで見つかる".to_string(),
            description: "新人VTuberを毎日発掘・紹介！あなたの新しい推しが見つかるかも。"
                .to_string(),
            url: "https://vtuber-matome.net".to_string(),
            domain: "vtuber-matome.net".to_string(),
            contact_email: "contact@vtuber-matome.net".to_string(),
            analytics_id: Some("G-SJ6FD6ZGJE".to_string()),
            page_size: 20,
            feed_size: 20,
            ad_interval: 5,
        }
    }
}

/// Where persisted state and rendered output live.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("cache"),
            output_dir: PathBuf::from("docs"),
        }
    }
}

impl PathsConfig {
    pub fn candidates_file(&self) -> PathBuf {
        self.cache_dir.join("candidates.json")
    }

    pub fn approved_file(&self) -> PathBuf {
        self.cache_dir.join("approved.json")
    }
}

/// HTTP timeout and retry policy shared by every outbound request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub max_attempts: u32,
    /// Delay before retry `n` is `base_delay_ms * n`.
    pub base_delay_ms: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_attempts: 3,
            base_delay_ms: 2000,
            user_agent: concat!("vtuber_scout/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// Chat completion endpoint used for introductions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 200,
            temperature: 0.7,
        }
    }
}

/// Aggregator scrape settings and the news site's metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    pub source_url: String,
    /// Element whose immediate children are the entries.
    pub container_selector: String,
    /// Element inside an entry holding the source-site label.
    pub label_selector: String,
    /// Anchor inside an entry holding the article link and title.
    pub link_selector: String,
    pub time_selector: String,
    /// Source-site label as displayed on the aggregator → stable site key.
    pub sites: BTreeMap<String, String>,
    /// Labels that are recognised but never kept.
    pub excluded: Vec<String>,
    pub max_items: usize,
    pub page_size: usize,
    pub cache_file: PathBuf,
    pub output_dir: PathBuf,
    pub site_name: String,
    pub site_url: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        let sites = [
            ("ホロライブ", "hololive"),
            ("にじさんじ", "nijisanji"),
            ("個人勢", "indie"),
            ("MoguLive", "mogulive"),
            ("PANORA", "panora"),
        ]
        .iter()
        .map(|(label, key)| (label.to_string(), key.to_string()))
        .collect();

        Self {
            source_url: "https://vtuber-news.example.net/".to_string(),
            container_selector: "ul.entry-list".to_string(),
            label_selector: ".entry-site".to_string(),
            link_selector: "a.entry-link".to_string(),
            time_selector: ".entry-time".to_string(),
            sites,
            excluded: vec!["PR".to_string()],
            max_items: 100,
            page_size: 50,
            cache_file: PathBuf::from("cache/articles.json"),
            output_dir: PathBuf::from("news"),
            site_name: "VTuberニュースまとめ".to_string(),
            site_url: "https://news.vtuber-matome.net".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or return defaults when no path is given.
    ///
    /// Fields absent from the file keep their default value. A file that is
    /// missing, unreadable or not valid YAML is logged and replaced by the
    /// defaults.
    #[instrument(level = "info", skip_all)]
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Config file not found; using defaults");
                return Self::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Config file unreadable; using defaults");
                return Self::default();
            }
        };
        match serde_yaml::from_str::<Config>(&raw) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded configuration");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Config file is malformed; using defaults");
                Self::default()
            }
        }
    }
}
