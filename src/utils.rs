//! Formatting, escaping, time and file system helpers shared across modules.

use chrono::{DateTime, FixedOffset, Utc};
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary)
/// with an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// First `max` characters of `s`.
pub fn take_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Escape free text for an HTML body: `&`, `<`, `>` become entities and
/// newlines become `<br>`.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br>"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Escape text placed inside a double-quoted HTML attribute.
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Human-readable subscriber count in Japanese units.
///
/// ```ignore
/// assert_eq!(format_subscriber_count(12_345), "1.2万人");
/// assert_eq!(format_subscriber_count(-1), "非公開");
/// ```
pub fn format_subscriber_count(count: i64) -> String {
    if count < 0 {
        "非公開".to_string()
    } else if count >= 10_000 {
        format!("{:.1}万人", count as f64 / 10_000.0)
    } else if count >= 1_000 {
        format!("{:.1}千人", count as f64 / 1_000.0)
    } else {
        format!("{count}人")
    }
}

/// Parse an RFC 3339 timestamp such as `2026-09-01T12:00:00Z`.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s.trim()).ok()
}

/// Whole days elapsed between `timestamp` and `now`.
pub fn days_since(timestamp: &str, now: DateTime<Utc>) -> Option<i64> {
    parse_timestamp(timestamp).map(|t| (now - t.with_timezone(&Utc)).num_days())
}

/// `2026年09月01日` style date, or an empty string when unparsable.
pub fn format_date_jp(timestamp: &str) -> String {
    parse_timestamp(timestamp)
        .map(|t| t.format("%Y年%m月%d日").to_string())
        .unwrap_or_default()
}

/// RFC 822 date as required by RSS `pubDate`.
pub fn format_rfc822(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S +0000").to_string()
}

/// Eight hex characters of the MD5 of the channel id, used as page file name.
pub fn channel_slug(channel_id: &str) -> String {
    let digest = format!("{:x}", md5::compute(channel_id.as_bytes()));
    digest[..8].to_string()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and deletes a scratch file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let scratch_path = path.join("..__write_check__");
    stdfs::File::create(&scratch_path)?;
    let _ = stdfs::remove_file(&scratch_path);
    debug!("Directory is writable");
    Ok(())
}

/// Write `contents` to `path` by writing a sibling temp file and renaming it
/// into place, so readers never observe a partially written file.
pub async fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, contents).await?;
    fs::rename(&tmp_path, path).await?;
    info!(path = %path.display(), "Wrote file");
    Ok(())
}
