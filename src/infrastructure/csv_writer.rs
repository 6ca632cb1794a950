//! CSV output.
//!
//! One row per post. The `comments` cell holds the comment list encoded as a
//! compact JSON array of strings (`["hi","bye"]`, `[]` when empty), quoted by
//! the usual RFC 4180 rules. [`parse_comments_cell`] reverses it.

use std::path::Path;

use crate::domain::{AppError, PostRecord, Result};

/// Header row, in `PostRecord` field order.
pub const CSV_HEADER: [&str; 6] = [
    "post_id",
    "title",
    "selftext",
    "author",
    "created_utc",
    "comments",
];

/// Writes the header and one row per record. The file is truncated first.
///
/// # Errors
/// Returns error if the file cannot be created or written.
pub fn write_csv(path: &Path, records: &[PostRecord]) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path).map_err(AppError::csv)?;

    // Written explicitly so an empty export still has a header.
    writer.write_record(CSV_HEADER).map_err(AppError::csv)?;

    for record in records {
        let created_utc = record.created_utc.to_string();
        let comments = render_comments_cell(&record.comments)?;
        writer
            .write_record([
                record.post_id.as_str(),
                record.title.as_str(),
                record.selftext.as_str(),
                record.author.as_str(),
                created_utc.as_str(),
                comments.as_str(),
            ])
            .map_err(AppError::csv)?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush {}", path.display()), e))?;

    Ok(records.len())
}

/// Canonical text form of a comment list.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn render_comments_cell(comments: &[String]) -> Result<String> {
    serde_json::to_string(comments).map_err(AppError::json_parse)
}

/// Inverse of [`render_comments_cell`].
///
/// # Errors
/// Returns error if the cell is not a JSON array of strings.
pub fn parse_comments_cell(cell: &str) -> Result<Vec<String>> {
    serde_json::from_str(cell).map_err(AppError::json_parse)
}

/// Reads records back from a file written by [`write_csv`].
///
/// # Errors
/// Returns error if the file cannot be read or a row is malformed.
pub fn read_csv(path: &Path) -> Result<Vec<PostRecord>> {
    let mut reader = csv::Reader::from_path(path).map_err(AppError::csv)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(AppError::csv)?;
        if row.len() != CSV_HEADER.len() {
            return Err(AppError::InvalidData {
                message: format!("Expected {} columns, found {}", CSV_HEADER.len(), row.len()),
            });
        }
        let created_utc = row[4].parse::<f64>().map_err(|e| AppError::InvalidData {
            message: format!("Invalid created_utc '{}': {e}", &row[4]),
        })?;
        records.push(PostRecord {
            post_id: row[0].to_string(),
            title: row[1].to_string(),
            selftext: row[2].to_string(),
            author: row[3].to_string(),
            created_utc,
            comments: parse_comments_cell(&row[5])?,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(id: &str, comments: &[&str]) -> PostRecord {
        PostRecord {
            post_id: id.into(),
            title: "Title, with comma".into(),
            selftext: "multi\nline \"quoted\"".into(),
            author: "None".into(),
            created_utc: 1_700_000_000.0,
            comments: comments.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    #[test]
    fn test_comments_cell_rendering() {
        assert_eq!(render_comments_cell(&[]).unwrap(), "[]");
        let cell = render_comments_cell(&["hi".into(), "say \"bye\"".into()]).unwrap();
        assert_eq!(cell, r#"["hi","say \"bye\""]"#);
        assert_eq!(
            parse_comments_cell(&cell).unwrap(),
            vec!["hi".to_string(), "say \"bye\"".to_string()]
        );
    }

    #[test]
    fn test_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[record("a1", &["hi", "bye"])]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let first = content.lines().next().unwrap();
        assert_eq!(first, "post_id,title,selftext,author,created_utc,comments");

        let loaded = read_csv(&path).unwrap();
        assert_eq!(loaded, vec![record("a1", &["hi", "bye"])]);
    }

    #[test]
    fn test_empty_input_writes_header_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        assert_eq!(write_csv(&path, &[]).unwrap(), 0);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "post_id,title,selftext,author,created_utc,comments\n");
        assert!(read_csv(&path).unwrap().is_empty());
    }

    #[test]
    fn test_comments_not_exploded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[record("a1", &["x", "y", "z"]), record("b2", &[])]).unwrap();

        let loaded = read_csv(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].comments.len(), 3);
        assert!(loaded[1].comments.is_empty());
    }
}
