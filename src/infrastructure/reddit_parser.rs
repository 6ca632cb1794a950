//! JSON parsing for Reddit API responses.
//!
//! Handles conversion from raw listing payloads to domain models.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{AppError, CommentNode, Result, Submission, SubmissionPage};

const LINK_KIND: &str = "t3";
const COMMENT_KIND: &str = "t1";
const MORE_KIND: &str = "more";

/// Author name Reddit reports for removed accounts.
const DELETED_AUTHOR: &str = "[deleted]";

#[derive(Debug, Deserialize)]
struct RawListing {
    data: RawListingData,
}

#[derive(Debug, Deserialize)]
struct RawListingData {
    #[serde(default)]
    after: Option<String>,
    #[serde(default)]
    children: Vec<RawThing>,
}

#[derive(Debug, Deserialize)]
struct RawThing {
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    created_utc: f64,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    id: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    parent_id: String,
    /// Either a nested listing or an empty string.
    #[serde(default)]
    replies: Value,
}

#[derive(Debug, Deserialize)]
struct RawMore {
    #[serde(default)]
    parent_id: String,
    #[serde(default)]
    children: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawMoreChildrenResponse {
    json: RawMoreChildrenJson,
}

#[derive(Debug, Deserialize)]
struct RawMoreChildrenJson {
    #[serde(default)]
    errors: Vec<Value>,
    #[serde(default)]
    data: Option<RawThings>,
}

#[derive(Debug, Deserialize)]
struct RawThings {
    #[serde(default)]
    things: Vec<RawThing>,
}

/// Raw OAuth token response.
#[derive(Debug, Deserialize)]
pub struct RawToken {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A converted comment-tree node with the fullname of its parent.
struct ParsedNode {
    parent: String,
    node: CommentNode,
}

/// Parses one page of a `/r/{forum}/new` listing.
///
/// # Errors
/// Returns error if JSON parsing fails.
pub fn parse_submission_page(data: &[u8]) -> Result<SubmissionPage> {
    let listing: RawListing = serde_json::from_slice(data).map_err(AppError::json_parse)?;

    let mut submissions = Vec::with_capacity(listing.data.children.len());
    for thing in listing.data.children {
        if thing.kind != LINK_KIND {
            tracing::debug!(kind = %thing.kind, "Skipping non-submission listing entry");
            continue;
        }
        let raw: RawLink = serde_json::from_value(thing.data).map_err(AppError::json_parse)?;
        submissions.push(Submission {
            id: raw.id,
            title: raw.title,
            selftext: raw.selftext,
            author: raw.author.filter(|a| a != DELETED_AUTHOR),
            created_utc: raw.created_utc,
        });
    }

    Ok(SubmissionPage {
        submissions,
        after: listing.data.after.filter(|a| !a.is_empty()),
    })
}

/// Parses a `/comments/{id}` response into the submission's comment forest.
///
/// # Errors
/// Returns error if JSON parsing fails or the comment listing is missing.
pub fn parse_comment_page(data: &[u8]) -> Result<Vec<CommentNode>> {
    let listings: Vec<RawListing> = serde_json::from_slice(data).map_err(AppError::json_parse)?;

    // [0] is the submission itself, [1] the comment tree.
    let comments = listings
        .into_iter()
        .nth(1)
        .ok_or_else(|| AppError::InvalidData {
            message: "Comment page has no comment listing".into(),
        })?;

    convert_children(comments.data.children)
}

/// Parses a "continue this thread" page and returns the replies of `comment_id`.
///
/// # Errors
/// Returns error if JSON parsing fails.
pub fn parse_thread_continuation(data: &[u8], comment_id: &str) -> Result<Vec<CommentNode>> {
    let forest = parse_comment_page(data)?;

    let replies = forest.into_iter().find_map(|node| match node {
        CommentNode::Comment { id, replies, .. } if id == comment_id => Some(replies),
        _ => None,
    });

    Ok(replies.unwrap_or_else(|| {
        tracing::debug!(comment_id, "Continuation page did not contain the parent comment");
        Vec::new()
    }))
}

/// Parses a `/api/morechildren` response and nests the flat result by parent.
///
/// Nodes whose parent is not part of the response are returned at the top
/// level, in response order.
///
/// # Errors
/// Returns error if JSON parsing fails or the API reports errors.
pub fn parse_more_children(data: &[u8]) -> Result<Vec<CommentNode>> {
    let raw: RawMoreChildrenResponse =
        serde_json::from_slice(data).map_err(AppError::json_parse)?;

    if !raw.json.errors.is_empty() {
        return Err(AppError::InvalidData {
            message: format!("morechildren returned errors: {:?}", raw.json.errors),
        });
    }

    let things = raw.json.data.map(|d| d.things).unwrap_or_default();
    let mut parsed = Vec::with_capacity(things.len());
    for thing in things {
        if let Some(node) = convert_thing(thing)? {
            parsed.push(node);
        }
    }

    Ok(nest_by_parent(parsed))
}

/// Parses the OAuth token endpoint response.
///
/// # Errors
/// Returns error if JSON parsing fails.
pub fn parse_token(data: &[u8]) -> Result<RawToken> {
    serde_json::from_slice(data).map_err(AppError::json_parse)
}

/// Strips the type prefix from a fullname (`t1_abc` -> `abc`).
#[must_use]
pub fn strip_fullname(fullname: &str) -> &str {
    fullname.split_once('_').map_or(fullname, |(_, id)| id)
}

fn convert_children(children: Vec<RawThing>) -> Result<Vec<CommentNode>> {
    let mut nodes = Vec::with_capacity(children.len());
    for thing in children {
        if let Some(parsed) = convert_thing(thing)? {
            nodes.push(parsed.node);
        }
    }
    Ok(nodes)
}

fn convert_thing(thing: RawThing) -> Result<Option<ParsedNode>> {
    match thing.kind.as_str() {
        COMMENT_KIND => {
            let raw: RawComment = serde_json::from_value(thing.data).map_err(AppError::json_parse)?;
            let replies = match raw.replies {
                Value::Object(_) => {
                    let listing: RawListing =
                        serde_json::from_value(raw.replies).map_err(AppError::json_parse)?;
                    convert_children(listing.data.children)?
                }
                _ => Vec::new(),
            };
            Ok(Some(ParsedNode {
                parent: raw.parent_id,
                node: CommentNode::Comment {
                    id: raw.id,
                    body: raw.body,
                    replies,
                },
            }))
        }
        MORE_KIND => {
            let raw: RawMore = serde_json::from_value(thing.data).map_err(AppError::json_parse)?;
            Ok(Some(ParsedNode {
                node: CommentNode::More {
                    parent_id: strip_fullname(&raw.parent_id).to_string(),
                    children: raw.children,
                },
                parent: raw.parent_id,
            }))
        }
        other => {
            tracing::debug!(kind = other, "Skipping unexpected comment-tree entry");
            Ok(None)
        }
    }
}

fn nest_by_parent(parsed: Vec<ParsedNode>) -> Vec<CommentNode> {
    let known: HashSet<String> = parsed
        .iter()
        .filter_map(|p| match &p.node {
            CommentNode::Comment { id, .. } => Some(format!("{COMMENT_KIND}_{id}")),
            CommentNode::More { .. } => None,
        })
        .collect();

    let mut roots = Vec::new();
    let mut children_of: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, p) in parsed.iter().enumerate() {
        let own = match &p.node {
            CommentNode::Comment { id, .. } => Some(format!("{COMMENT_KIND}_{id}")),
            CommentNode::More { .. } => None,
        };
        if known.contains(&p.parent) && own.as_deref() != Some(p.parent.as_str()) {
            children_of.entry(p.parent.clone()).or_default().push(idx);
        } else {
            roots.push(idx);
        }
    }

    let mut slots: Vec<Option<CommentNode>> = parsed.into_iter().map(|p| Some(p.node)).collect();
    roots
        .into_iter()
        .filter_map(|idx| attach(idx, &mut slots, &children_of))
        .collect()
}

fn attach(
    idx: usize,
    slots: &mut [Option<CommentNode>],
    children_of: &HashMap<String, Vec<usize>>,
) -> Option<CommentNode> {
    let mut node = slots.get_mut(idx)?.take()?;
    if let CommentNode::Comment { id, replies, .. } = &mut node {
        if let Some(child_ids) = children_of.get(&format!("{COMMENT_KIND}_{id}")) {
            for &child in child_ids {
                if let Some(child_node) = attach(child, slots, children_of) {
                    replies.push(child_node);
                }
            }
        }
    }
    Some(node)
}
