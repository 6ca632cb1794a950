//! Output formatting for run summaries.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{CollectOutcome, ExportReport};

/// One-line summary of a collection run.
pub fn format_collect_summary(forum: &str, outcome: &CollectOutcome) -> String {
    let comments: usize = outcome.records.iter().map(|r| r.comments.len()).sum();
    let status = match &outcome.failure {
        None => "complete".green().to_string(),
        Some(e) if e.is_remote() => format!("{} (Reddit API: {e})", "partial".yellow()),
        Some(e) => format!("{} ({e})", "partial".yellow()),
    };

    format!(
        "{} r/{}: {} posts, {} comments, {}",
        "📥".bold(),
        forum,
        outcome.records.len().to_string().cyan(),
        comments.to_string().cyan(),
        status
    )
}

/// Table of export results, one row per format.
pub fn format_export_table(report: &ExportReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Format", "Path", "Rows", "Status"]);

    for result in &report.results {
        let (rows, status) = match &result.outcome {
            Ok(rows) => (rows.to_string(), "saved".to_string()),
            Err(e) => ("-".to_string(), truncate(&e.to_string(), 60)),
        };

        table.add_row(vec![
            result.format.to_string(),
            result.path.display().to_string(),
            rows,
            status,
        ]);
    }

    table.to_string()
}

/// Truncates a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
