//! Approval of pending candidates.
//!
//! A channel moves from the candidate collection to the approved collection
//! exactly once. On the way it gets its latest uploads and an introduction.
//! Asking to approve an id that is not pending changes nothing.

use crate::api::{AskAsync, Introduction, IntroWriter};
use crate::config::PathsConfig;
use crate::models::{Channel, ChannelStatus};
use crate::scrapers::youtube::VideoSource;
use crate::store::{load_collection, save_collection};
use crate::utils::truncate_for_log;
use chrono::{DateTime, Utc};
use std::error::Error;
use tracing::{info, instrument, warn};

/// Candidate and approved collections loaded for one run.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    pub candidates: Vec<Channel>,
    pub approved: Vec<Channel>,
}

impl Ledger {
    pub async fn load(paths: &PathsConfig) -> Self {
        Self {
            candidates: load_collection(&paths.candidates_file()).await,
            approved: load_collection(&paths.approved_file()).await,
        }
    }

    pub async fn save(&self, paths: &PathsConfig) -> Result<(), Box<dyn Error>> {
        save_collection(&paths.approved_file(), &self.approved).await?;
        save_collection(&paths.candidates_file(), &self.candidates).await?;
        Ok(())
    }

    pub fn pending(&self) -> Vec<&Channel> {
        self.candidates.iter().filter(|c| c.is_pending()).collect()
    }

    pub fn is_approved(&self, channel_id: &str) -> bool {
        self.approved.iter().any(|c| c.channel_id == channel_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    Approved(Box<Channel>),
    NotPending,
}

/// Performs the `pending → approved` transition.
#[derive(Debug)]
pub struct Approver<'a, V, A> {
    videos: &'a V,
    intros: &'a IntroWriter<A>,
    max_videos: usize,
}

impl<'a, V, A> Approver<'a, V, A>
where
    V: VideoSource,
    A: AskAsync,
{
    pub fn new(videos: &'a V, intros: &'a IntroWriter<A>, max_videos: usize) -> Self {
        Self {
            videos,
            intros,
            max_videos,
        }
    }

    /// Approve `channel_id` if it is pending.
    ///
    /// Latest uploads and the introduction are best-effort; neither can make
    /// the approval fail.
    ///
    /// # Arguments
    ///
    /// * `ledger` - Candidate and approved collections, updated in place.
    /// * `channel_id` - The channel to approve.
    /// * `now` - Recorded as `approved_at`.
    ///
    /// # Returns
    ///
    /// The approved record, or [`ApprovalOutcome::NotPending`] when there is
    /// no pending candidate with that id.
    #[instrument(level = "info", skip(self, ledger, now))]
    pub async fn approve(
        &self,
        ledger: &mut Ledger,
        channel_id: &str,
        now: DateTime<Utc>,
    ) -> ApprovalOutcome {
        let Some(index) = ledger
            .candidates
            .iter()
            .position(|c| c.channel_id == channel_id && c.is_pending())
        else {
            warn!("Channel not found in pending candidates");
            return ApprovalOutcome::NotPending;
        };

        if ledger.is_approved(channel_id) {
            warn!("Channel already approved; dropping stale candidate entry");
            ledger.candidates.remove(index);
            return ApprovalOutcome::NotPending;
        }

        let mut channel = ledger.candidates[index].clone();

        let mut videos = self.videos.latest_videos(channel_id).await;
        videos.truncate(self.max_videos);
        info!(count = videos.len(), title = %channel.title, "Fetched latest videos");

        let introduction = self.intros.write(&channel, &videos).await;
        match &introduction {
            Introduction::Generated(_) => {
                info!(preview = %truncate_for_log(introduction.text(), 90), "Generated introduction")
            }
            Introduction::Fallback { reason, .. } => info!(%reason, "Using fallback introduction"),
        }

        channel.latest_videos = videos;
        channel.introduction = Some(introduction.into_text());
        channel.status = ChannelStatus::Approved;
        channel.approved_at = Some(now.to_rfc3339());

        ledger.candidates.remove(index);
        ledger.approved.push(channel.clone());
        info!(title = %channel.title, "Approved channel");
        ApprovalOutcome::Approved(Box::new(channel))
    }

    /// Approve every pending candidate, in candidate order.
    #[instrument(level = "info", skip_all)]
    pub async fn approve_all(&self, ledger: &mut Ledger, now: DateTime<Utc>) -> Vec<Channel> {
        let ids: Vec<String> = ledger
            .pending()
            .into_iter()
            .map(|c| c.channel_id.clone())
            .collect();

        let mut approved = Vec::with_capacity(ids.len());
        for id in ids {
            if let ApprovalOutcome::Approved(channel) = self.approve(ledger, &id, now).await {
                approved.push(*channel);
            }
        }
        info!(count = approved.len(), "Approved all pending candidates");
        approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecentVideo;
    use chrono::TimeZone;
    use std::cell::Cell;

    struct FakeVideos {
        calls: Cell<usize>,
        count: usize,
    }

    impl VideoSource for FakeVideos {
        async fn latest_videos(&self, channel_id: &str) -> Vec<RecentVideo> {
            self.calls.set(self.calls.get() + 1);
            (0..self.count)
                .map(|i| RecentVideo {
                    video_id: format!("{channel_id}-v{i}"),
                    title: format!("動画{i}"),
                    ..Default::default()
                })
                .collect()
        }
    }

    struct NoModel;

    impl AskAsync for NoModel {
        async fn ask(&self, _prompt: &str) -> Result<String, Box<dyn Error>> {
            Err("unreachable".into())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
    }

    fn pending(id: &str) -> Channel {
        Channel {
            channel_id: id.to_string(),
            title: format!("{id}ちゃん"),
            description: "よろしくお願いします".to_string(),
            status: ChannelStatus::Pending,
            ..Default::default()
        }
    }

    fn ledger() -> Ledger {
        Ledger {
            candidates: vec![pending("A"), pending("B"), pending("C")],
            approved: vec![],
        }
    }

    #[tokio::test]
    async fn test_approve_moves_channel_exactly_once() {
        let videos = FakeVideos { calls: Cell::new(0), count: 8 };
        let intros: IntroWriter<NoModel> = IntroWriter::new(None);
        let approver = Approver::new(&videos, &intros, 5);
        let mut ledger = ledger();

        let outcome = approver.approve(&mut ledger, "B", now()).await;
        let ApprovalOutcome::Approved(channel) = outcome else {
            panic!("expected approval");
        };
        assert_eq!(channel.status, ChannelStatus::Approved);
        assert_eq!(channel.approved_at.as_deref(), Some(now().to_rfc3339().as_str()));
        assert_eq!(channel.latest_videos.len(), 5);
        assert_eq!(
            channel.introduction.as_deref(),
            Some("BちゃんさんがVTuberとしてデビュー！ よろしくお願いします")
        );

        let ids: Vec<&str> = ledger.candidates.iter().map(|c| c.channel_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
        assert_eq!(ledger.approved.len(), 1);
        assert_eq!(ledger.approved[0].channel_id, "B");

        // Second approval of the same id is a no-op.
        let again = approver.approve(&mut ledger, "B", now()).await;
        assert_eq!(again, ApprovalOutcome::NotPending);
        assert_eq!(ledger.approved.len(), 1);
        assert_eq!(ledger.candidates.len(), 2);
        assert_eq!(videos.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_pending() {
        let videos = FakeVideos { calls: Cell::new(0), count: 0 };
        let intros: IntroWriter<NoModel> = IntroWriter::new(None);
        let approver = Approver::new(&videos, &intros, 5);
        let mut ledger = ledger();

        let outcome = approver.approve(&mut ledger, "Z", now()).await;
        assert_eq!(outcome, ApprovalOutcome::NotPending);
        assert_eq!(ledger.candidates.len(), 3);
        assert!(ledger.approved.is_empty());
    }

    #[tokio::test]
    async fn test_video_failure_still_approves() {
        let videos = FakeVideos { calls: Cell::new(0), count: 0 };
        let intros = IntroWriter::new(Some(NoModel));
        let approver = Approver::new(&videos, &intros, 5);
        let mut ledger = ledger();

        let outcome = approver.approve(&mut ledger, "A", now()).await;
        let ApprovalOutcome::Approved(channel) = outcome else {
            panic!("expected approval");
        };
        assert!(channel.latest_videos.is_empty());
        assert!(channel.introduction.unwrap().starts_with("AちゃんさんがVTuberとしてデビュー！"));
    }

    #[tokio::test]
    async fn test_approve_all_empties_pending() {
        let videos = FakeVideos { calls: Cell::new(0), count: 1 };
        let intros: IntroWriter<NoModel> = IntroWriter::new(None);
        let approver = Approver::new(&videos, &intros, 5);
        let mut ledger = ledger();

        let approved = approver.approve_all(&mut ledger, now()).await;
        let ids: Vec<&str> = approved.iter().map(|c| c.channel_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert!(ledger.pending().is_empty());
        assert_eq!(ledger.approved.len(), 3);
    }

    #[tokio::test]
    async fn test_already_approved_candidate_is_not_duplicated() {
        let videos = FakeVideos { calls: Cell::new(0), count: 1 };
        let intros: IntroWriter<NoModel> = IntroWriter::new(None);
        let approver = Approver::new(&videos, &intros, 5);
        let mut ledger = ledger();
        let mut done = pending("A");
        done.status = ChannelStatus::Approved;
        ledger.approved.push(done);

        let outcome = approver.approve(&mut ledger, "A", now()).await;
        assert_eq!(outcome, ApprovalOutcome::NotPending);
        assert_eq!(ledger.approved.len(), 1);
        assert!(ledger.candidates.iter().all(|c| c.channel_id != "A"));
    }

    #[tokio::test]
    async fn test_ledger_save_and_load() {
        let dir = std::env::temp_dir().join("vtuber_scout_approval_ledger");
        let _ = std::fs::remove_dir_all(&dir);
        let paths = PathsConfig {
            cache_dir: dir.clone(),
            output_dir: dir.join("docs"),
        };

        let original = ledger();
        original.save(&paths).await.unwrap();
        let loaded = Ledger::load(&paths).await;
        assert_eq!(loaded.candidates, original.candidates);
        assert!(loaded.approved.is_empty());
    }
}
