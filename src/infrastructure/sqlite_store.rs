//! `SQLite` export of posts and their denormalized comments.
//!
//! Both tables are dropped and recreated on every export, so a rerun
//! replaces the previous contents instead of appending.

use std::path::Path;

use rusqlite::{params, Connection};

use crate::domain::{AppError, PostRecord, Result};

const REPLACE_SCHEMA: &str = r"
    DROP TABLE IF EXISTS posts;
    DROP TABLE IF EXISTS comments;

    CREATE TABLE posts (
        post_id TEXT,
        title TEXT,
        selftext TEXT,
        author TEXT,
        created_utc REAL
    );

    CREATE TABLE comments (
        post_id TEXT,
        comment TEXT
    );
";

/// Row counts written by one export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub posts: usize,
    pub comments: usize,
}

/// Export target backed by a single `SQLite` file.
pub struct SqliteExport {
    conn: Connection,
}

impl SqliteExport {
    /// Opens or creates the database file.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(AppError::database)?;
        Ok(Self { conn })
    }

    /// Replaces the `posts` and `comments` tables with `records`.
    ///
    /// Runs in one transaction; on error nothing is changed.
    ///
    /// # Errors
    /// Returns error if any statement fails.
    pub fn replace_tables(&mut self, records: &[PostRecord]) -> Result<TableCounts> {
        let tx = self.conn.transaction().map_err(AppError::database)?;
        tx.execute_batch(REPLACE_SCHEMA)
            .map_err(AppError::database)?;

        let mut counts = TableCounts::default();
        {
            let mut insert_post = tx
                .prepare(
                    "INSERT INTO posts (post_id, title, selftext, author, created_utc)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .map_err(AppError::database)?;
            let mut insert_comment = tx
                .prepare("INSERT INTO comments (post_id, comment) VALUES (?1, ?2)")
                .map_err(AppError::database)?;

            for record in records {
                let row = record.post_row();
                insert_post
                    .execute(params![
                        row.post_id,
                        row.title,
                        row.selftext,
                        row.author,
                        row.created_utc
                    ])
                    .map_err(AppError::database)?;
                counts.posts += 1;

                for row in record.comment_rows() {
                    insert_comment
                        .execute(params![row.post_id, row.comment])
                        .map_err(AppError::database)?;
                    counts.comments += 1;
                }
            }
        }
        tx.commit().map_err(AppError::database)?;

        tracing::debug!(
            posts = counts.posts,
            comments = counts.comments,
            "Replaced SQLite tables"
        );

        Ok(counts)
    }

    /// Closes the connection, surfacing any error from the final flush.
    ///
    /// # Errors
    /// Returns error if `SQLite` fails to close cleanly.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| AppError::database(e))
    }
}

/// Writes `records` to the database at `path` and closes it.
///
/// The connection is also released when any step fails, since it is dropped
/// on the early return.
///
/// # Errors
/// Returns error if the database cannot be opened, written or closed.
pub fn write_sqlite(path: &Path, records: &[PostRecord]) -> Result<TableCounts> {
    let mut store = SqliteExport::open(path)?;
    let counts = store.replace_tables(records)?;
    store.close()?;
    Ok(counts)
}
