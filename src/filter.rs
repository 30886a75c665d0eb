//! Inclusion rules for discovered channels.
//!
//! Checks run in a fixed order and stop at the first failure:
//! subscriber count, channel age, upload count, then VTuber keyword match.

use crate::config::DiscoveryConfig;
use crate::models::Channel;
use crate::utils::days_since;
use chrono::{DateTime, Utc};
use std::fmt;

/// Thresholds a channel has to meet to become a candidate.
#[derive(Debug, Clone)]
pub struct FilterPolicy {
    pub max_subscribers: i64,
    pub max_channel_age_days: i64,
    pub min_videos: u64,
    /// Stored lowercased.
    keywords: Vec<String>,
}

/// Why a channel was turned away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TooManySubscribers { count: i64, max: i64 },
    TooOld { age_days: i64, max: i64 },
    TooFewVideos { count: u64, min: u64 },
    NoVtuberKeyword,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManySubscribers { count, max } => {
                write!(f, "登録者数が{max}人を超えている（{count}人）")
            }
            Self::TooOld { age_days, max } => {
                write!(f, "チャンネル開設から{age_days}日経過（上限{max}日）")
            }
            Self::TooFewVideos { count, min } => {
                write!(f, "動画数が{count}本（最低{min}本必要）")
            }
            Self::NoVtuberKeyword => write!(f, "VTuber関連キーワードが見つからない"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(Rejection),
}

impl FilterPolicy {
    pub fn new(
        max_subscribers: i64,
        max_channel_age_days: i64,
        min_videos: u64,
        keywords: &[String],
    ) -> Self {
        Self {
            max_subscribers,
            max_channel_age_days,
            min_videos,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self::new(
            config.max_subscribers,
            config.max_channel_age_days,
            config.min_videos,
            &config.keywords,
        )
    }

    /// Case-insensitive keyword match over name, description and branding keywords.
    pub fn looks_like_vtuber(&self, channel: &Channel) -> bool {
        let text = format!(
            "{} {} {}",
            channel.title, channel.description, channel.keywords
        )
        .to_lowercase();
        self.keywords.iter().any(|kw| text.contains(kw.as_str()))
    }

    /// Run the checks in order and stop at the first failure.
    ///
    /// # Arguments
    ///
    /// * `channel` - The detailed channel record.
    /// * `now` - Reference time for the channel age.
    ///
    /// # Returns
    ///
    /// [`Verdict::Pass`], or the first [`Rejection`] in the order subscribers,
    /// age, uploads, keywords.
    pub fn evaluate(&self, channel: &Channel, now: DateTime<Utc>) -> Verdict {
        // A hidden count is never compared.
        if !channel.subscribers_hidden() && channel.subscriber_count > self.max_subscribers {
            return Verdict::Fail(Rejection::TooManySubscribers {
                count: channel.subscriber_count,
                max: self.max_subscribers,
            });
        }

        if let Some(age_days) = days_since(&channel.published_at, now) {
            if age_days > self.max_channel_age_days {
                return Verdict::Fail(Rejection::TooOld {
                    age_days,
                    max: self.max_channel_age_days,
                });
            }
        }

        if channel.video_count < self.min_videos {
            return Verdict::Fail(Rejection::TooFewVideos {
                count: channel.video_count,
                min: self.min_videos,
            });
        }

        if !self.looks_like_vtuber(channel) {
            return Verdict::Fail(Rejection::NoVtuberKeyword);
        }

        Verdict::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HIDDEN_SUBSCRIBERS;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap()
    }

    fn policy() -> FilterPolicy {
        FilterPolicy::from_config(&DiscoveryConfig::default())
    }

    fn channel(days_old: i64, subscribers: i64, videos: u64, description: &str) -> Channel {
        Channel {
            channel_id: format!("UC{days_old}"),
            title: "テストチャンネル".to_string(),
            description: description.to_string(),
            published_at: (now() - Duration::days(days_old)).to_rfc3339(),
            subscriber_count: subscribers,
            video_count: videos,
            ..Default::default()
        }
    }

    #[test]
    fn test_passing_channel() {
        let c = channel(10, 120, 5, "新人VTuberです！");
        assert_eq!(policy().evaluate(&c, now()), Verdict::Pass);
    }

    #[test]
    fn test_hidden_subscribers_always_pass_count_check() {
        for max in [0, 1, 1000, i64::MAX] {
            let policy = FilterPolicy::new(max, 90, 3, &["vtuber".to_string()]);
            let c = channel(10, HIDDEN_SUBSCRIBERS, 5, "VTuber");
            assert_eq!(policy.evaluate(&c, now()), Verdict::Pass, "threshold {max}");
        }
    }

    #[test]
    fn test_too_many_subscribers() {
        let c = channel(10, 5000, 5, "VTuber");
        assert_eq!(
            policy().evaluate(&c, now()),
            Verdict::Fail(Rejection::TooManySubscribers { count: 5000, max: 1000 })
        );
    }

    #[test]
    fn test_age_limit_is_inclusive() {
        assert_eq!(policy().evaluate(&channel(90, 10, 5, "VTuber"), now()), Verdict::Pass);
        assert_eq!(
            policy().evaluate(&channel(91, 10, 5, "VTuber"), now()),
            Verdict::Fail(Rejection::TooOld { age_days: 91, max: 90 })
        );
    }

    #[test]
    fn test_missing_creation_date_skips_age_check() {
        let mut c = channel(10, 10, 5, "VTuber");
        c.published_at = String::new();
        assert_eq!(policy().evaluate(&c, now()), Verdict::Pass);
    }

    #[test]
    fn test_checks_short_circuit_in_order() {
        // Fails every rule; the subscriber rule is reported.
        let c = channel(200, 5000, 0, "cooking");
        assert!(matches!(
            policy().evaluate(&c, now()),
            Verdict::Fail(Rejection::TooManySubscribers { .. })
        ));

        // Old, few videos, no keyword: age is reported.
        let c = channel(200, 10, 0, "cooking");
        assert!(matches!(
            policy().evaluate(&c, now()),
            Verdict::Fail(Rejection::TooOld { .. })
        ));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_and_checks_branding() {
        let mut c = channel(10, 10, 5, "hello");
        assert_eq!(
            policy().evaluate(&c, now()),
            Verdict::Fail(Rejection::NoVtuberKeyword)
        );
        c.keywords = "LIVE2D gaming".to_string();
        assert_eq!(policy().evaluate(&c, now()), Verdict::Pass);
    }

    #[test]
    fn test_three_search_results_scenario() {
        let fresh = channel(10, 50, 5, "個人勢VTuberとして活動中");
        let old = channel(100, 50, 5, "VTuber");
        let mut no_keyword = channel(40, 50, 5, "料理とキャンプの動画");
        no_keyword.title = "アウトドア日記".to_string();

        let p = policy();
        assert_eq!(p.evaluate(&fresh, now()), Verdict::Pass);
        let old_verdict = p.evaluate(&old, now());
        let kw_verdict = p.evaluate(&no_keyword, now());
        assert_eq!(
            old_verdict,
            Verdict::Fail(Rejection::TooOld { age_days: 100, max: 90 })
        );
        assert_eq!(kw_verdict, Verdict::Fail(Rejection::NoVtuberKeyword));
        assert_ne!(old_verdict, kw_verdict);
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            Rejection::TooFewVideos { count: 1, min: 3 }.to_string(),
            "動画数が1本（最低3本必要）"
        );
        assert_eq!(
            Rejection::TooOld { age_days: 100, max: 90 }.to_string(),
            "チャンネル開設から100日経過（上限90日）"
        );
    }
}
