//! # VTuber Scout
//!
//! Finds newly debuted, small VTuber channels on YouTube, lets an operator
//! approve them, and publishes the approved channels as a static discovery
//! site. A second pipeline scrapes a VTuber news aggregator into a capped
//! article cache and publishes it as a static news site.
//!
//! ## Usage
//!
//! ```sh
//! vtuber_scout                # collect candidates, then rebuild docs/
//! vtuber_scout approve        # interactive approval
//! vtuber_scout approve-all    # approve everything pending, rebuild docs/
//! vtuber_scout generate       # rebuild docs/ only
//! vtuber_scout status         # print counts
//! vtuber_scout news           # scrape news, rebuild news/
//! ```
//!
//! ## Architecture
//!
//! 1. **Collect**: search YouTube, look up details, filter, store as pending
//! 2. **Approve**: fetch latest uploads, write an introduction, move to approved
//! 3. **Generate**: render paginated index pages, detail pages and feeds
//!
//! Every step runs sequentially. Caches are flat JSON files replaced
//! atomically on each save.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod approval;
mod cli;
mod collect;
mod config;
mod console;
mod fetcher;
mod filter;
mod models;
mod news;
mod outputs;
mod scrapers;
mod store;
mod utils;

use api::{ChatCompletions, IntroWriter};
use approval::{Approver, Ledger};
use cli::{Cli, Command};
use config::Config;
use fetcher::Fetcher;
use outputs::writer;
use scrapers::youtube::YouTubeClient;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    let command = args.command();
    info!(?command, "vtuber_scout starting up");
    debug!(config = ?args.config, "Parsed CLI arguments");

    let config = Config::load(args.config.as_deref());

    let youtube_key = args.youtube_api_key.clone().filter(|k| !k.trim().is_empty());
    if command.needs_youtube() && youtube_key.is_none() {
        error!("YOUTUBE_API_KEY is not set; pass --youtube-api-key or set the environment variable");
        return Err("missing YouTube API key".into());
    }

    let fetcher = Fetcher::new(&config.fetch)?;

    match command {
        Command::Collect => {
            let youtube = YouTubeClient::new(fetcher, &config, youtube_key.unwrap_or_default());
            run_collect(&youtube, &config).await?;
        }
        Command::Approve | Command::ApproveAll => {
            let youtube = YouTubeClient::new(
                fetcher.clone(),
                &config,
                youtube_key.unwrap_or_default(),
            );
            let model = args
                .openai_api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .map(|key| ChatCompletions::new(fetcher, config.openai.clone(), key));
            if model.is_none() {
                info!("No OpenAI API key; introductions use the fixed template");
            }
            let intros = IntroWriter::new(model);
            let approver = Approver::new(
                &youtube,
                &intros,
                config.discovery.latest_videos as usize,
            );

            if command == Command::Approve {
                run_approve(&approver, &config).await?;
            } else {
                run_approve_all(&approver, &config).await?;
            }
        }
        Command::Generate => {
            let ledger = Ledger::load(&config.paths).await;
            writer::write_discovery_site(&ledger.approved, &config, Utc::now()).await?;
        }
        Command::Status => {
            let ledger = Ledger::load(&config.paths).await;
            console::print_status(&mut std::io::stdout().lock(), &ledger)?;
        }
        Command::News => {
            news::run(&fetcher, &config.news, Utc::now()).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn run_collect(youtube: &YouTubeClient, config: &Config) -> Result<(), Box<dyn Error>> {
    let mut ledger = Ledger::load(&config.paths).await;
    let now = Utc::now();
    let report = collect::collect_candidates(youtube, &config.discovery, &mut ledger, now).await;
    info!(
        queries = report.queries,
        hits = report.hits,
        looked_up = report.looked_up,
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        "Collection finished"
    );

    ledger.save(&config.paths).await?;
    console::print_candidates(&mut std::io::stdout().lock(), &ledger.pending(), now)?;

    writer::write_discovery_site(&ledger.approved, config, now).await?;
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn run_approve(
    approver: &Approver<'_, YouTubeClient, ChatCompletions>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let mut ledger = Ledger::load(&config.paths).await;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    let approved = console::approval_session(
        stdin,
        &mut stdout,
        approver,
        &mut ledger,
        &config.paths,
        Utc::now,
    )
    .await?;

    if approved > 0 {
        writer::write_discovery_site(&ledger.approved, config, Utc::now()).await?;
    }
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn run_approve_all(
    approver: &Approver<'_, YouTubeClient, ChatCompletions>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let mut ledger = Ledger::load(&config.paths).await;
    let now = Utc::now();
    let pending = ledger.pending().len();
    println!("全{pending}件を一括承認します...");

    let approved = approver.approve_all(&mut ledger, now).await;
    for channel in &approved {
        println!("  ✅ {}", channel.title);
    }

    ledger.save(&config.paths).await?;
    writer::write_discovery_site(&ledger.approved, config, now).await?;
    Ok(())
}
