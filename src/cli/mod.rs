//! CLI interface using clap.
//!
//! Provides command-line arguments for the tool.

use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;

/// Subreddit Harvest - Collect a subreddit's newest posts and comments.
///
/// Writes `subreddit_<name>_<date>.{json,csv,db}`. Credentials are read from
/// `REDDIT_CLIENT_ID`, `REDDIT_CLIENT_SECRET` and `REDDIT_USERNAME`.
#[derive(Parser, Debug)]
#[command(name = "subreddit-harvest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subreddit to collect (with or without the `r/` prefix).
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub subreddit: String,

    /// Maximum number of submissions to fetch [default: 100].
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Directory for the exported files [default: current directory].
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Configuration file (defaults to ~/.subreddit-harvest/config.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Exit with status 2 when fetching or any export failed.
    #[arg(long)]
    pub strict: bool,

    /// Hide the progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
