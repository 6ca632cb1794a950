//! Domain models for harvested subreddit data.
//!
//! `PostRecord` is what the collector produces and every exporter consumes.
//! `Submission` and `CommentNode` are the shapes handed over by a forum source
//! before flattening.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::AppError;

/// Author value stored when the submission author is unknown or deleted.
pub const UNKNOWN_AUTHOR: &str = "None";

/// One fetched submission with its flattened comment bodies.
///
/// Field order is the serialized column order for every export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Base-36 submission id, without the `t3_` prefix.
    pub post_id: String,
    pub title: String,
    pub selftext: String,
    /// Display name, or [`UNKNOWN_AUTHOR`].
    pub author: String,
    /// Seconds since the Unix epoch.
    pub created_utc: f64,
    /// Comment bodies in breadth-first order. Threading is not kept.
    #[serde(default)]
    pub comments: Vec<String>,
}

impl PostRecord {
    /// Projection onto the `posts` table columns.
    #[must_use]
    pub fn post_row(&self) -> PostRow<'_> {
        PostRow {
            post_id: &self.post_id,
            title: &self.title,
            selftext: &self.selftext,
            author: &self.author,
            created_utc: self.created_utc,
        }
    }

    /// One `comments` table row per comment; none for a post without comments.
    pub fn comment_rows(&self) -> impl Iterator<Item = CommentRow<'_>> {
        self.comments.iter().map(move |comment| CommentRow {
            post_id: &self.post_id,
            comment,
        })
    }
}

/// Row of the `posts` table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostRow<'a> {
    pub post_id: &'a str,
    pub title: &'a str,
    pub selftext: &'a str,
    pub author: &'a str,
    pub created_utc: f64,
}

/// Row of the `comments` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRow<'a> {
    pub post_id: &'a str,
    pub comment: &'a str,
}

/// Submission metadata as returned by a listing, before comments are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: String,
    pub title: String,
    pub selftext: String,
    /// `None` when the account is gone.
    pub author: Option<String>,
    pub created_utc: f64,
}

impl Submission {
    /// Builds the final record once comments are flattened.
    #[must_use]
    pub fn into_record(self, comments: Vec<String>) -> PostRecord {
        PostRecord {
            post_id: self.id,
            title: self.title,
            selftext: self.selftext,
            author: self.author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            created_utc: self.created_utc,
            comments,
        }
    }
}

/// A node in a submission's comment tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentNode {
    /// A resolved comment with its direct replies.
    Comment {
        id: String,
        body: String,
        replies: Vec<CommentNode>,
    },
    /// A "load more comments" placeholder.
    ///
    /// `children` lists the ids hidden behind it. An empty list marks a
    /// "continue this thread" link whose replies hang off `parent_id`.
    More {
        parent_id: String,
        children: Vec<String>,
    },
}

impl CommentNode {
    /// Convenience constructor for a leaf comment.
    #[must_use]
    pub fn comment(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Comment {
            id: id.into(),
            body: body.into(),
            replies: Vec::new(),
        }
    }
}

/// Result of collecting one subreddit.
///
/// `records` holds everything gathered before `failure`, if any.
#[derive(Debug, Default)]
pub struct CollectOutcome {
    pub records: Vec<PostRecord>,
    pub failure: Option<AppError>,
}

impl CollectOutcome {
    /// True when the collection ran to the end without a remote failure.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// The three persisted representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Sqlite,
}

impl ExportFormat {
    /// All formats, in the order they are written.
    pub const ALL: [Self; 3] = [Self::Json, Self::Csv, Self::Sqlite];

    /// File extension appended to the base name.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Sqlite => "db",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Csv => write!(f, "CSV"),
            Self::Sqlite => write!(f, "SQLite"),
        }
    }
}

/// Outcome of a single format export.
#[derive(Debug)]
pub struct FormatResult {
    pub format: ExportFormat,
    pub path: PathBuf,
    /// Rows written on success, the failure otherwise.
    pub outcome: Result<usize, AppError>,
}

/// Per-format outcomes of one export call.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub results: Vec<FormatResult>,
}

impl ExportReport {
    /// True when every format was written.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_ok())
    }

    /// Number of formats that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_err()).count()
    }
}
