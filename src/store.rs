//! Flat JSON persistence for candidates, approved channels and articles.
//!
//! Each collection is a single JSON array on disk. A run reads the whole file,
//! mutates it in memory and writes it back wholesale through
//! [`write_atomic`](crate::utils::write_atomic). There is no locking; only one
//! run is expected at a time.
//!
//! A missing file is an empty collection. So is a file that fails to parse:
//! the corruption is logged and the run starts a fresh collection instead of
//! failing.

use crate::utils::write_atomic;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Read the JSON array at `path`; missing or unparsable files yield an empty `Vec`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_collection<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No cache file yet; starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "Cache file unreadable; starting empty");
            return Vec::new();
        }
    };

    if raw.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => {
            debug!(count = items.len(), "Loaded cache");
            items
        }
        Err(e) => {
            warn!(error = %e, "Cache file is corrupt; starting a fresh collection");
            Vec::new()
        }
    }
}

/// Replace the JSON array at `path` with `items`.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = items.len()))]
pub async fn save_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(items)?;
    write_atomic(path, json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Channel, ChannelStatus};
    use std::fs;
    use std::path::PathBuf;

    fn tmp_dir(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("vtuber_scout_store_{}", name));
        let _ = fs::remove_dir_all(&p);
        fs::create_dir_all(&p).unwrap();
        p
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tmp_dir("missing");
        let loaded: Vec<Channel> = load_collection(&dir.join("nope.json")).await;
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_empty() {
        let dir = tmp_dir("corrupt");
        let path = dir.join("candidates.json");
        fs::write(&path, "[{\"channel_id\": ").unwrap();

        let loaded: Vec<Channel> = load_collection(&path).await;
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_order_and_japanese_text() {
        let dir = tmp_dir("roundtrip");
        let path = dir.join("cache").join("approved.json");
        let channels = vec![
            Channel {
                channel_id: "UC2".to_string(),
                title: "二番目".to_string(),
                status: ChannelStatus::Approved,
                ..Default::default()
            },
            Channel {
                channel_id: "UC1".to_string(),
                title: "一番目".to_string(),
                status: ChannelStatus::Approved,
                ..Default::default()
            },
        ];

        save_collection(&path, &channels).await.unwrap();
        let loaded: Vec<Channel> = load_collection(&path).await;
        assert_eq!(loaded, channels);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("二番目"));
    }
}
