//! Export service.
//!
//! Writes the collected records as JSON lines, CSV and `SQLite`. Each format
//! has its own failure boundary: an error is logged and recorded in the
//! report, and the remaining formats are still attempted. The per-format
//! boundary is deliberate; a failed format never skips the ones after it.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::domain::{ExportFormat, ExportReport, FormatResult, PostRecord, Result};
use crate::infrastructure::{write_csv, write_json_lines, write_sqlite};

/// Path of the file for `format`: the base path with the extension appended.
#[must_use]
pub fn output_path(base: &Path, format: ExportFormat) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

/// Writes `records` in every format next to `base`.
pub fn export(records: &[PostRecord], base: &Path) -> ExportReport {
    if let Some(parent) = base.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(dir = %parent.display(), "Failed to create output directory: {}", e);
        }
    }

    let results = ExportFormat::ALL
        .into_iter()
        .map(|format| {
            let path = output_path(base, format);
            let outcome = export_format(format, &path, records);

            match &outcome {
                Ok(rows) => {
                    tracing::info!(format = %format, path = %path.display(), rows, "Data saved");
                }
                Err(e) => {
                    tracing::error!(
                        format = %format,
                        path = %path.display(),
                        "An error occurred while saving data: {}",
                        e
                    );
                }
            }

            FormatResult {
                format,
                path,
                outcome,
            }
        })
        .collect();

    ExportReport { results }
}

fn export_format(format: ExportFormat, path: &Path, records: &[PostRecord]) -> Result<usize> {
    match format {
        ExportFormat::Json => write_json_lines(path, records),
        ExportFormat::Csv => write_csv(path, records),
        ExportFormat::Sqlite => {
            let counts = write_sqlite(path, records)?;
            tracing::debug!(comments = counts.comments, "Wrote denormalized comments");
            Ok(counts.posts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{read_csv, read_json_lines};
    use tempfile::tempdir;

    fn records() -> Vec<PostRecord> {
        vec![
            PostRecord {
                post_id: "a1".into(),
                title: "T".into(),
                selftext: String::new(),
                author: "None".into(),
                created_utc: 1_700_000_000.0,
                comments: vec!["hi".into(), "bye".into()],
            },
            PostRecord {
                post_id: "b2".into(),
                title: "U".into(),
                selftext: "text".into(),
                author: "bob".into(),
                created_utc: 1_699_999_000.5,
                comments: vec![],
            },
        ]
    }

    #[test]
    fn test_output_path_appends_extension() {
        let base = Path::new("out/subreddit_rust_2024-01-01");
        assert_eq!(
            output_path(base, ExportFormat::Sqlite),
            PathBuf::from("out/subreddit_rust_2024-01-01.db")
        );
        assert_eq!(
            output_path(base, ExportFormat::Json),
            PathBuf::from("out/subreddit_rust_2024-01-01.json")
        );
    }

    #[test]
    fn test_exports_all_three_formats() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("nested").join("subreddit_rust_2024-01-01");

        let report = export(&records(), &base);
        assert!(report.all_succeeded());
        assert_eq!(report.results.len(), 3);
        for result in &report.results {
            assert!(result.path.exists());
            assert_eq!(*result.outcome.as_ref().unwrap(), 2);
        }

        let json = read_json_lines(&output_path(&base, ExportFormat::Json)).unwrap();
        assert_eq!(json, records());
        let csv = read_csv(&output_path(&base, ExportFormat::Csv)).unwrap();
        assert_eq!(csv, records());
    }

    #[test]
    fn test_one_failure_does_not_skip_the_others() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("subreddit_rust_2024-01-01");
        // A directory where the JSON file should go makes that write fail.
        std::fs::create_dir(output_path(&base, ExportFormat::Json)).unwrap();

        let report = export(&records(), &base);
        assert_eq!(report.failure_count(), 1);
        assert!(report.results[0].outcome.is_err());
        assert!(report.results[1].outcome.is_ok());
        assert!(report.results[2].outcome.is_ok());
        assert!(output_path(&base, ExportFormat::Csv).is_file());
        assert!(output_path(&base, ExportFormat::Sqlite).is_file());
    }

    #[test]
    fn test_rerun_replaces_every_output() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("subreddit_rust_2024-01-01");
        assert!(export(&records(), &base).all_succeeded());

        let second = vec![PostRecord {
            post_id: "c3".into(),
            title: "Later".into(),
            selftext: String::new(),
            author: "carol".into(),
            created_utc: 1_700_000_100.0,
            comments: vec!["only".into()],
        }];
        assert!(export(&second, &base).all_succeeded());

        let json = read_json_lines(&output_path(&base, ExportFormat::Json)).unwrap();
        assert_eq!(json, second);
        let csv = read_csv(&output_path(&base, ExportFormat::Csv)).unwrap();
        assert_eq!(csv, second);

        let conn =
            rusqlite::Connection::open(output_path(&base, ExportFormat::Sqlite)).unwrap();
        let ids: Vec<String> = conn
            .prepare("SELECT post_id FROM posts")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(ids, vec!["c3".to_string()]);
        let comments: Vec<(String, String)> = conn
            .prepare("SELECT post_id, comment FROM comments")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(comments, vec![("c3".to_string(), "only".to_string())]);
    }

    #[test]
    fn test_empty_collection_creates_all_outputs() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("subreddit_quiet_2024-01-01");

        let report = export(&[], &base);
        assert!(report.all_succeeded());
        assert!(report
            .results
            .iter()
            .all(|r| r.path.exists() && matches!(r.outcome, Ok(0))));
    }
}
