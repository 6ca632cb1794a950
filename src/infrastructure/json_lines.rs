//! Line-delimited JSON output.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::domain::{AppError, PostRecord, Result};

/// Writes one JSON object per record, one record per line.
///
/// The file is truncated first.
///
/// # Errors
/// Returns error if the file cannot be created or written.
pub fn write_json_lines(path: &Path, records: &[PostRecord]) -> Result<usize> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create {}", path.display()), e))?;
    let mut writer = BufWriter::new(file);

    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(AppError::json_parse)?;
        writer
            .write_all(b"\n")
            .map_err(|e| AppError::io("Failed to write JSON line", e))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush {}", path.display()), e))?;

    Ok(records.len())
}

/// Reads records back from a file written by [`write_json_lines`].
///
/// Blank lines are skipped.
///
/// # Errors
/// Returns error if the file cannot be read or a line is not a valid record.
pub fn read_json_lines(path: &Path) -> Result<Vec<PostRecord>> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open {}", path.display()), e))?;

    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| AppError::io("Failed to read JSON line", e))?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line).map_err(AppError::json_parse)?);
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
            title: format!("title {id}"),
            selftext: "line one\nline two".into(),
            author: "None".into(),
            created_utc: 1_700_000_000.25,
            comments: comments.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    #[test]
    fn test_roundtrip_keeps_empty_lists_and_empty_bodies() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let records = vec![
            record("a1", &["hi", "", "quote \" and, comma"]),
            record("b2", &[]),
        ];

        assert_eq!(write_json_lines(&path, &records).unwrap(), 2);
        assert_eq!(read_json_lines(&path).unwrap(), records);
    }

    #[test]
    fn test_one_object_per_line_in_field_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json_lines(&path, &[record("a1", &["hi"])]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with(r#"{"post_id":"a1","title":"title a1","selftext""#));
        assert!(lines[0].ends_with(r#""comments":["hi"]}"#));
    }

    #[test]
    fn test_rewrite_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json_lines(&path, &[record("a1", &[]), record("b2", &[])]).unwrap();
        write_json_lines(&path, &[record("c3", &[])]).unwrap();

        let loaded = read_json_lines(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].post_id, "c3");
    }

    #[test]
    fn test_empty_input_creates_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        assert_eq!(write_json_lines(&path, &[]).unwrap(), 0);
        assert!(std::fs::read_to_string(&path).unwrap().is_empty());
    }
}
