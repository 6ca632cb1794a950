//! Comment-tree flattening.
//!
//! Walks a submission's comment forest breadth first and keeps only the
//! comment bodies. Placeholders are resolved through the source as they are
//! reached and their replacements take the placeholder's place in the walk.
//! Threading is discarded.

use std::collections::{HashSet, VecDeque};

use crate::domain::{CommentNode, ForumSource, Result};

/// Flattens `forest` into comment bodies, expanding placeholders on the way.
///
/// `more_limit` caps how many placeholders are expanded; the rest are dropped.
/// `None` expands all of them.
///
/// # Errors
/// Returns the first error raised by the source while expanding.
pub async fn flatten_comments<S>(
    source: &S,
    post_id: &str,
    forest: Vec<CommentNode>,
    more_limit: Option<usize>,
) -> Result<Vec<String>>
where
    S: ForumSource + ?Sized,
{
    let mut queue: VecDeque<CommentNode> = forest.into();
    let mut bodies = Vec::new();
    let mut expanded = 0usize;
    let mut seen: HashSet<(String, Vec<String>)> = HashSet::new();

    while let Some(node) = queue.pop_front() {
        match node {
            CommentNode::Comment { body, replies, .. } => {
                bodies.push(body);
                queue.extend(replies);
            }
            CommentNode::More {
                parent_id,
                children,
            } => {
                if more_limit.is_some_and(|limit| expanded >= limit) {
                    tracing::trace!(post_id, "Dropping placeholder past expansion limit");
                    continue;
                }
                // A continuation link on the submission itself has nothing to load.
                if children.is_empty() && parent_id == post_id {
                    continue;
                }
                if !seen.insert((parent_id.clone(), children.clone())) {
                    tracing::warn!(post_id, parent_id = %parent_id, "Placeholder returned twice, skipping");
                    continue;
                }

                let replacement = if children.is_empty() {
                    source.continue_thread(post_id, &parent_id).await?
                } else {
                    source.more_children(post_id, &children).await?
                };
                expanded += 1;

                for node in replacement.into_iter().rev() {
                    queue.push_front(node);
                }
            }
        }
    }

    tracing::debug!(
        post_id,
        comments = bodies.len(),
        placeholders = expanded,
        "Flattened comment tree"
    );

    Ok(bodies)
}
