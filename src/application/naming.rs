//! Output naming.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};

use crate::domain::{AppError, Result};

/// Strips the `/r/` or `r/` prefix users often type in front of a subreddit.
#[must_use]
pub fn normalize_forum(input: &str) -> &str {
    let trimmed = input.trim().trim_start_matches('/');
    trimmed
        .strip_prefix("r/")
        .unwrap_or(trimmed)
        .trim_end_matches('/')
}

/// Normalizes `input` and checks it is a plain subreddit name.
///
/// Accepts ASCII letters, digits and `_`, plus `+` for multireddits. The name
/// is used as a URL path segment and inside the output file name, so anything
/// else is rejected.
///
/// # Errors
/// Returns `AppError::Config` if the name is empty or has other characters.
pub fn validate_forum(input: &str) -> Result<&str> {
    let forum = normalize_forum(input);
    let valid = !forum.is_empty()
        && forum
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '+');

    if valid {
        Ok(forum)
    } else {
        Err(AppError::Config {
            message: format!("'{input}' is not a subreddit name"),
        })
    }
}

/// `subreddit_<lowercased forum>_<YYYY-MM-DD>`.
#[must_use]
pub fn base_name(forum: &str, date: NaiveDate) -> String {
    format!(
        "subreddit_{}_{}",
        forum.to_lowercase(),
        date.format("%Y-%m-%d")
    )
}

/// Current date in UTC.
#[must_use]
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Base path of today's outputs for `forum` inside `dir`.
#[must_use]
pub fn base_path(dir: &Path, forum: &str) -> PathBuf {
    dir.join(base_name(forum, today_utc()))
}
