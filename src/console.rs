//! Operator console: candidate listing, status report and the interactive
//! approval loop.
//!
//! Reports go to stdout; diagnostics stay on the tracing subscriber.

use crate::api::AskAsync;
use crate::approval::{ApprovalOutcome, Approver, Ledger};
use crate::config::PathsConfig;
use crate::models::Channel;
use crate::scrapers::youtube::VideoSource;
use crate::utils::{days_since, format_subscriber_count};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info, instrument};

/// One line describing a candidate, prefixed by its 1-based index.
pub fn candidate_line(index: usize, channel: &Channel, now: DateTime<Utc>) -> String {
    let age = days_since(&channel.published_at, now)
        .map(|d| format!("開設{d}日前"))
        .unwrap_or_else(|| "開設日不明".to_string());
    format!(
        "{index:>3}. {title} | 登録者 {subs} | {age} | 動画 {videos}本 | {id}",
        title = channel.title,
        subs = format_subscriber_count(channel.subscriber_count),
        videos = channel.video_count,
        id = channel.channel_id,
    )
}

pub fn print_candidates(out: &mut impl Write, pending: &[&Channel], now: DateTime<Utc>) -> std::io::Result<()> {
    writeln!(out, "承認待ちの候補: {}件", pending.len())?;
    for (i, channel) in pending.iter().enumerate() {
        writeln!(out, "{}", candidate_line(i + 1, channel, now))?;
        writeln!(out, "       {}", channel.channel_url())?;
    }
    Ok(())
}

pub fn print_status(out: &mut impl Write, ledger: &Ledger) -> std::io::Result<()> {
    writeln!(out, "承認待ち: {}件", ledger.pending().len())?;
    writeln!(out, "承認済み: {}件", ledger.approved.len())?;
    writeln!(out, "候補総数: {}件", ledger.candidates.len())?;
    Ok(())
}

/// What the operator typed at the approval prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Quit,
    Indices {
        /// Zero-based indices into the listed candidates, in input order.
        valid: Vec<usize>,
        /// Tokens that are not a number in range, as typed.
        invalid: Vec<String>,
    },
}

/// Parse `"1, 3"` style input against a list of `len` candidates.
///
/// Empty tokens are ignored and repeated numbers count once. A token that is
/// not a number in `1..=len` is collected into `invalid` without affecting
/// the rest of the line.
pub fn parse_selection(input: &str, len: usize) -> Selection {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Selection::Quit;
    }

    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => {
                if !valid.contains(&(n - 1)) {
                    valid.push(n - 1);
                }
            }
            _ => invalid.push(token.to_string()),
        }
    }
    Selection::Indices { valid, invalid }
}

/// Interactive approval over `input`, saving the ledger after every line.
///
/// Returns when nothing is pending, on `q`, or at end of input.
#[instrument(level = "info", skip_all)]
pub async fn approval_session<R, V, A>(
    mut input: R,
    out: &mut impl Write,
    approver: &Approver<'_, V, A>,
    ledger: &mut Ledger,
    paths: &PathsConfig,
    clock: impl Fn() -> DateTime<Utc>,
) -> Result<usize, Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    V: VideoSource,
    A: AskAsync,
{
    let mut approved_total = 0;
    loop {
        let pending: Vec<Channel> = ledger.pending().into_iter().cloned().collect();
        if pending.is_empty() {
            writeln!(out, "承認待ちの候補はありません。")?;
            break;
        }

        let refs: Vec<&Channel> = pending.iter().collect();
        print_candidates(out, &refs, clock())?;
        write!(out, "承認する番号をカンマ区切りで入力 (q で終了): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).await? == 0 {
            writeln!(out)?;
            break;
        }

        let indices = match parse_selection(&line, pending.len()) {
            Selection::Quit => break,
            Selection::Indices { valid, invalid } => {
                for token in invalid {
                    writeln!(out, "無効な番号: {token}")?;
                }
                valid
            }
        };

        for index in indices {
            let channel = &pending[index];
            match approver.approve(ledger, &channel.channel_id, clock()).await {
                ApprovalOutcome::Approved(approved) => {
                    approved_total += 1;
                    writeln!(out, "✅ 承認しました: {}", approved.title)?;
                    if let Some(intro) = &approved.introduction {
                        writeln!(out, "   {intro}")?;
                    }
                }
                ApprovalOutcome::NotPending => {
                    writeln!(out, "⚠ 承認待ちではありません: {}", channel.title)?;
                }
            }
        }

        if let Err(e) = ledger.save(paths).await {
            error!(error = %e, "Failed to save caches after approval");
            return Err(e);
        }
    }

    info!(approved = approved_total, "Approval session finished");
    Ok(approved_total)
}
