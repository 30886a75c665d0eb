//! Command-line interface definitions.
//!
//! Credentials can be given as flags or through the environment.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for vtuber_scout.
///
/// # Examples
///
/// ```sh
/// # Search YouTube for new candidates (the default command)
/// YOUTUBE_API_KEY=... vtuber_scout
///
/// # Review candidates interactively, with generated introductions
/// vtuber_scout --openai-api-key sk-... approve
///
/// # Rebuild the news site with a custom configuration
/// vtuber_scout --config ./config.yaml news
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// YouTube Data API key (required by collect, approve and approve-all)
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: Option<String>,

    /// OpenAI API key for introductions; a fixed template is used without it
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Search for new channels and store the ones that pass the filter
    Collect,
    /// Approve pending candidates interactively
    Approve,
    /// Approve every pending candidate
    ApproveAll,
    /// Regenerate the discovery site from approved channels
    Generate,
    /// Print candidate and approval counts
    Status,
    /// Scrape the news aggregator and regenerate the news site
    News,
}

impl Command {
    /// Whether the command talks to the YouTube Data API.
    pub fn needs_youtube(self) -> bool {
        matches!(self, Self::Collect | Self::Approve | Self::ApproveAll)
    }
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Collect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_collect() {
        let cli = Cli::parse_from(["vtuber_scout", "--youtube-api-key", "yt"]);
        assert_eq!(cli.command(), Command::Collect);
        assert_eq!(cli.youtube_api_key.as_deref(), Some("yt"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_subcommands() {
        let cli = Cli::parse_from(["vtuber_scout", "-c", "/tmp/config.yaml", "approve-all"]);
        assert_eq!(cli.command(), Command::ApproveAll);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.yaml")));

        for (arg, expected) in [
            ("collect", Command::Collect),
            ("approve", Command::Approve),
            ("generate", Command::Generate),
            ("status", Command::Status),
            ("news", Command::News),
        ] {
            assert_eq!(Cli::parse_from(["vtuber_scout", arg]).command(), expected);
        }
    }

    #[test]
    fn test_only_youtube_commands_need_the_key() {
        assert!(Command::Collect.needs_youtube());
        assert!(Command::Approve.needs_youtube());
        assert!(Command::ApproveAll.needs_youtube());
        assert!(!Command::Generate.needs_youtube());
        assert!(!Command::Status.needs_youtube());
        assert!(!Command::News.needs_youtube());
    }
}
