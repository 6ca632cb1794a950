//! Subreddit collection service.
//!
//! Pages through a forum's newest submissions, resolves each comment tree and
//! builds the in-memory `PostRecord` collection.

use std::collections::HashSet;

use indicatif::ProgressBar;

use crate::domain::{AppError, CollectOutcome, ForumSource, PostRecord, Result};
use crate::infrastructure::{make_count_progress, LISTING_PAGE_SIZE};

use super::comments::flatten_comments;

/// Options for a collection run.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Upper bound on the number of submissions collected.
    pub max_items: usize,
    /// Cap on placeholders expanded per submission; `None` expands all.
    pub more_limit: Option<usize>,
    /// Draw a progress bar on the terminal.
    pub show_progress: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            max_items: 100,
            more_limit: None,
            show_progress: false,
        }
    }
}

/// Collects up to `options.max_items` of the newest submissions of `forum`.
///
/// Never fails: the first error stops collection for the forum, is logged,
/// and is returned alongside the records gathered before it.
pub async fn collect<S>(source: &S, forum: &str, options: &CollectOptions) -> CollectOutcome
where
    S: ForumSource + ?Sized,
{
    let progress = make_count_progress(
        options.max_items as u64,
        "Fetching submissions",
        options.show_progress,
    );

    let mut records = Vec::new();
    let result = collect_into(source, forum, options, &mut records, &progress).await;
    progress.finish_and_clear();

    match result {
        Ok(()) => {
            tracing::info!(forum, records = records.len(), "Collection finished");
            CollectOutcome {
                records,
                failure: None,
            }
        }
        Err(e) => {
            tracing::error!(
                forum,
                collected = records.len(),
                "An error occurred while extracting data from r/{}: {}",
                forum,
                e
            );
            CollectOutcome {
                records,
                failure: Some(e),
            }
        }
    }
}

async fn collect_into<S>(
    source: &S,
    forum: &str,
    options: &CollectOptions,
    records: &mut Vec<PostRecord>,
    progress: &ProgressBar,
) -> Result<()>
where
    S: ForumSource + ?Sized,
{
    if forum.trim().is_empty() {
        return Err(AppError::InvalidData {
            message: "Subreddit name is empty".into(),
        });
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut after: Option<String> = None;

    while records.len() < options.max_items {
        let wanted = (options.max_items - records.len()).min(LISTING_PAGE_SIZE);
        let page = source
            .new_submissions(forum, wanted, after.as_deref())
            .await?;

        if page.submissions.is_empty() {
            break;
        }

        for submission in page.submissions {
            if records.len() >= options.max_items {
                break;
            }
            if !seen.insert(submission.id.clone()) {
                tracing::debug!(post_id = %submission.id, "Skipping duplicate submission");
                continue;
            }

            let forest = source.comment_forest(&submission.id).await?;
            let comments =
                flatten_comments(source, &submission.id, forest, options.more_limit).await?;

            records.push(submission.into_record(comments));
            progress.inc(1);
        }

        match page.after {
            Some(cursor) => after = Some(cursor),
            None => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::{CommentNode, Submission, SubmissionPage};

    /// Scripted source: listing pages keyed by cursor, forests keyed by post.
    #[derive(Default)]
    struct ScriptedSource {
        pages: HashMap<Option<String>, SubmissionPage>,
        forests: HashMap<String, Vec<CommentNode>>,
        fail_forest_for: Option<String>,
        fail_page_after: Option<String>,
        requested_limits: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl ForumSource for ScriptedSource {
        async fn new_submissions(
            &self,
            _forum: &str,
            limit: usize,
            after: Option<&str>,
        ) -> Result<SubmissionPage> {
            if let Ok(mut limits) = self.requested_limits.lock() {
                limits.push(limit);
            }
            let key = after.map(str::to_string);
            if key.is_some() && key == self.fail_page_after {
                return Err(AppError::Api {
                    status: 429,
                    message: "Too Many Requests".into(),
                });
            }
            let mut page = self.pages.get(&key).cloned().unwrap_or_default();
            page.submissions.truncate(limit);
            Ok(page)
        }

        async fn comment_forest(&self, post_id: &str) -> Result<Vec<CommentNode>> {
            if self.fail_forest_for.as_deref() == Some(post_id) {
                return Err(AppError::Http {
                    message: "connection reset".into(),
                    source: None,
                });
            }
            Ok(self.forests.get(post_id).cloned().unwrap_or_default())
        }

        async fn more_children(
            &self,
            _post_id: &str,
            _children: &[String],
        ) -> Result<Vec<CommentNode>> {
            Ok(Vec::new())
        }

        async fn continue_thread(
            &self,
            _post_id: &str,
            _comment_id: &str,
        ) -> Result<Vec<CommentNode>> {
            Ok(Vec::new())
        }
    }

    fn submission(id: &str) -> Submission {
        Submission {
            id: id.into(),
            title: format!("title {id}"),
            selftext: String::new(),
            author: Some("someone".into()),
            created_utc: 1_700_000_000.0,
        }
    }

    fn page(ids: &[&str], after: Option<&str>) -> SubmissionPage {
        SubmissionPage {
            submissions: ids.iter().map(|id| submission(id)).collect(),
            after: after.map(str::to_string),
        }
    }

    fn two_page_source() -> ScriptedSource {
        let mut source = ScriptedSource::default();
        source
            .pages
            .insert(None, page(&["a", "b", "c"], Some("t3_c")));
        source
            .pages
            .insert(Some("t3_c".into()), page(&["d", "e"], None));
        source.forests.insert(
            "a".into(),
            vec![CommentNode::comment("x", "hi"), CommentNode::comment("y", "bye")],
        );
        source
    }

    fn options(max_items: usize) -> CollectOptions {
        CollectOptions {
            max_items,
            ..Default::default()
        }
    }

    fn ids(outcome: &CollectOutcome) -> Vec<&str> {
        outcome.records.iter().map(|r| r.post_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_collects_across_pages_in_fetch_order() {
        let source = two_page_source();
        let outcome = collect(&source, "rust", &options(10)).await;

        assert!(outcome.is_complete());
        assert_eq!(ids(&outcome), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(outcome.records[0].comments, vec!["hi", "bye"]);
        assert!(outcome.records[1].comments.is_empty());
        assert_eq!(outcome.records[0].author, "someone");
    }

    #[tokio::test]
    async fn test_never_exceeds_max_items() {
        for max in 0..=6 {
            let source = two_page_source();
            let outcome = collect(&source, "rust", &options(max)).await;
            assert!(outcome.records.len() <= max);
            assert_eq!(outcome.records.len(), max.min(5));
        }
    }

    #[tokio::test]
    async fn test_requests_only_what_is_missing() {
        let source = two_page_source();
        collect(&source, "rust", &options(4)).await;
        assert_eq!(*source.requested_limits.lock().unwrap(), vec![4, 1]);
    }

    #[tokio::test]
    async fn test_duplicates_across_pages_are_dropped() {
        let mut source = ScriptedSource::default();
        source.pages.insert(None, page(&["a", "b"], Some("t3_b")));
        source
            .pages
            .insert(Some("t3_b".into()), page(&["b", "c"], None));

        let outcome = collect(&source, "rust", &options(10)).await;
        assert_eq!(ids(&outcome), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_comment_failure_returns_partial_records() {
        let mut source = two_page_source();
        source.fail_forest_for = Some("c".into());

        let outcome = collect(&source, "rust", &options(10)).await;
        assert!(!outcome.is_complete());
        assert_eq!(ids(&outcome), vec!["a", "b"]);
        assert!(matches!(outcome.failure, Some(AppError::Http { .. })));
    }

    #[tokio::test]
    async fn test_page_failure_keeps_first_page() {
        let mut source = two_page_source();
        source.fail_page_after = Some("t3_c".into());

        let outcome = collect(&source, "rust", &options(10)).await;
        assert_eq!(ids(&outcome), vec!["a", "b", "c"]);
        assert!(matches!(
            outcome.failure,
            Some(AppError::Api { status: 429, .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_forum_name_is_failure_without_records() {
        let source = two_page_source();
        let outcome = collect(&source, "  ", &options(10)).await;
        assert!(outcome.records.is_empty());
        assert!(matches!(
            outcome.failure,
            Some(AppError::InvalidData { .. })
        ));
        assert!(source.requested_limits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_listing_is_complete() {
        let source = ScriptedSource::default();
        let outcome = collect(&source, "quiet", &options(10)).await;
        assert!(outcome.is_complete());
        assert!(outcome.records.is_empty());
    }
}
