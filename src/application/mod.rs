//! Application layer - use cases and orchestration.
//!
//! Collection of a subreddit into `PostRecord`s, comment flattening, and
//! export to the three output formats.

pub mod collector;
pub mod comments;
pub mod exporter;
pub mod formatter;
pub mod naming;

pub use collector::{collect, CollectOptions};
pub use comments::flatten_comments;
pub use exporter::{export, output_path};
pub use formatter::{format_collect_summary, format_export_table};
pub use naming::{base_name, base_path, normalize_forum, today_utc, validate_forum};
