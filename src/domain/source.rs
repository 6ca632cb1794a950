//! The forum source seam.
//!
//! The collector only talks to a remote forum through this trait, so the
//! Reddit HTTP client and in-memory test sources are interchangeable.

use async_trait::async_trait;

use super::error::Result;
use super::models::{CommentNode, Submission};

/// One page of a submission listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionPage {
    pub submissions: Vec<Submission>,
    /// Cursor for the next page; `None` when the listing is exhausted.
    pub after: Option<String>,
}

/// Read access to a forum's newest submissions and their comment trees.
#[async_trait]
pub trait ForumSource: Send + Sync {
    /// Fetches up to `limit` of the newest submissions, starting after `after`.
    async fn new_submissions(
        &self,
        forum: &str,
        limit: usize,
        after: Option<&str>,
    ) -> Result<SubmissionPage>;

    /// Fetches the comment tree of a submission, placeholders included.
    async fn comment_forest(&self, post_id: &str) -> Result<Vec<CommentNode>>;

    /// Resolves the comments hidden behind a "more comments" placeholder.
    ///
    /// Returned nodes are the placeholder's replacements, already nested.
    async fn more_children(&self, post_id: &str, children: &[String])
        -> Result<Vec<CommentNode>>;

    /// Fetches the replies of `comment_id` for a "continue this thread" link.
    async fn continue_thread(&self, post_id: &str, comment_id: &str) -> Result<Vec<CommentNode>>;
}
