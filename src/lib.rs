//! Subreddit Harvest - collect a subreddit's newest posts and comments.
//!
//! The collector pages through a forum's newest submissions via a
//! [`domain::ForumSource`], flattens every comment tree into a list of bodies,
//! and the exporter writes the result as JSON lines, CSV and `SQLite`.

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
