//! Domain layer - core types and errors.
//!
//! This layer contains pure domain models and error types
//! without any I/O of its own.

pub mod config;
pub mod error;
pub mod models;
pub mod source;

pub use config::{AppConfig, CollectConfig, Credentials, OutputConfig, RedditConfig};
pub use error::{AppError, Result};
pub use models::{
    CollectOutcome, CommentNode, CommentRow, ExportFormat, ExportReport, FormatResult, PostRecord,
    PostRow, Submission, UNKNOWN_AUTHOR,
};
pub use source::{ForumSource, SubmissionPage};
