//! Subreddit Harvest - Collect a subreddit's newest posts and comments.
//!
//! Fetches submissions through the Reddit API, flattens their comment trees
//! and saves the result as JSON lines, CSV and `SQLite`:
//!
//!   subreddit-harvest rust                  # 100 newest posts of r/rust
//!   subreddit-harvest rust --limit 20 -o out
//!   subreddit-harvest rust --strict         # exit 2 if anything failed

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use subreddit_harvest::application::{
    base_path, collect, export, format_collect_summary, format_export_table, validate_forum,
    CollectOptions,
};
use subreddit_harvest::cli::Cli;
use subreddit_harvest::domain::{self, CollectOutcome};
use subreddit_harvest::infrastructure::{credentials_from_env, load_config, RedditClient};

/// Exit status for `--strict` runs that caught a failure.
const EXIT_PARTIAL_FAILURE: i32 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit 1; --help and --version exit 0.
            let code = i32::from(e.use_stderr());
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    // Load .env file if present
    let _ = dotenvy::dotenv();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Main application logic. Returns the process exit code.
async fn run(cli: Cli) -> domain::Result<i32> {
    let forum = validate_forum(&cli.subreddit)?;

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(limit) = cli.limit {
        config.collect.limit = limit;
    }
    if let Some(dir) = cli.output_dir {
        config.output.dir = Some(dir);
    }

    let options = CollectOptions {
        max_items: config.collect.limit,
        more_limit: config.collect.more_limit,
        show_progress: !cli.no_progress,
    };

    let outcome = match RedditClient::new(config.reddit.clone(), credentials_from_env()) {
        Ok(client) => collect(&client, forum, &options).await,
        Err(e) => {
            tracing::error!("Failed to set up Reddit client: {}", e);
            CollectOutcome {
                records: Vec::new(),
                failure: Some(e),
            }
        }
    };
    println!("{}", format_collect_summary(forum, &outcome));

    let base = base_path(&config.output_dir(), forum);
    let report = export(&outcome.records, &base);

    for result in report.results.iter().filter(|r| r.outcome.is_ok()) {
        println!(
            "{} Data saved to {}",
            "✓".green().bold(),
            result.path.display()
        );
    }
    println!("{}", format_export_table(&report));

    if cli.strict && (!outcome.is_complete() || !report.all_succeeded()) {
        return Ok(EXIT_PARTIAL_FAILURE);
    }

    Ok(0)
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
