//! Infrastructure layer - external adapters (HTTP, files, database).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod csv_writer;
pub mod json_lines;
pub mod progress;
pub mod reddit_client;
pub mod reddit_parser;
pub mod sqlite_store;

pub use config::{credentials_from_env, load_config};
pub use csv_writer::{parse_comments_cell, read_csv, write_csv};
pub use json_lines::{read_json_lines, write_json_lines};
pub use progress::make_count_progress;
pub use reddit_client::{RedditClient, LISTING_PAGE_SIZE};
pub use sqlite_store::{write_sqlite, SqliteExport, TableCounts};
