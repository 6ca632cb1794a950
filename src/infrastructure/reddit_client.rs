//! Reddit OAuth API client.
//!
//! Authenticates as a script app with the client-credentials grant and
//! implements [`ForumSource`] over the listing and comment endpoints.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::{redirect, Client, Response};

use crate::domain::{
    AppError, CommentNode, Credentials, ForumSource, RedditConfig, Result, SubmissionPage,
};

use super::reddit_parser::{
    parse_comment_page, parse_more_children, parse_submission_page, parse_thread_continuation,
    parse_token,
};

/// Maximum ids accepted by `/api/morechildren` per call.
const MORE_CHILDREN_BATCH: usize = 100;

/// Maximum page size accepted by listing endpoints.
pub const LISTING_PAGE_SIZE: usize = 100;

/// Authenticated Reddit API client.
pub struct RedditClient {
    http: Client,
    config: RedditConfig,
    credentials: Credentials,
    token: Mutex<Option<String>>,
}

impl RedditClient {
    /// Builds the HTTP client. No request is made until the first fetch.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(config: RedditConfig, credentials: Credentials) -> Result<Self> {
        // Unknown subreddits redirect to a search page; treat that as an error status.
        let http = Client::builder()
            .user_agent(credentials.user_agent())
            .timeout(config.timeout())
            .redirect(redirect::Policy::none())
            .build()
            .map_err(AppError::http)?;

        Ok(Self {
            http,
            config,
            credentials,
            token: Mutex::new(None),
        })
    }

    /// Returns the cached bearer token, requesting one on first use.
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        tracing::debug!(url = %self.config.auth_url, "Requesting access token");

        let response = self
            .http
            .post(&self.config.auth_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(AppError::http)?;

        let status = response.status();
        let body = response.bytes().await.map_err(AppError::http)?;
        if !status.is_success() {
            return Err(AppError::Auth {
                message: format!(
                    "token endpoint returned {status}: {}",
                    String::from_utf8_lossy(&body)
                ),
            });
        }

        let raw = parse_token(&body)?;
        let token = raw.access_token.ok_or_else(|| AppError::Auth {
            message: raw
                .error
                .unwrap_or_else(|| "no access token in response".to_string()),
        })?;

        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.clone());
        }
        tracing::info!("Authenticated with Reddit API");

        Ok(token)
    }

    fn cached_token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    /// Performs an authenticated GET and returns the response body.
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        let token = self.access_token().await?;
        let url = format!("{}{path}", self.config.api_base_url.trim_end_matches('/'));

        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .query(&[("raw_json", "1")])
            .send()
            .await
            .map_err(AppError::http)?;

        log_rate_limit(&response);

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    format!("GET {path} failed")
                } else {
                    body
                },
            });
        }

        let body = response.bytes().await.map_err(AppError::http)?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl ForumSource for RedditClient {
    async fn new_submissions(
        &self,
        forum: &str,
        limit: usize,
        after: Option<&str>,
    ) -> Result<SubmissionPage> {
        let limit = limit.clamp(1, LISTING_PAGE_SIZE).to_string();
        let mut query = vec![("limit", limit.as_str())];
        if let Some(after) = after {
            query.push(("after", after));
        }

        let body = self.get(&format!("/r/{forum}/new"), &query).await?;
        let page = parse_submission_page(&body)?;

        tracing::debug!(
            forum,
            count = page.submissions.len(),
            has_more = page.after.is_some(),
            "Fetched submission page"
        );

        Ok(page)
    }

    async fn comment_forest(&self, post_id: &str) -> Result<Vec<CommentNode>> {
        let body = self.get(&format!("/comments/{post_id}"), &[]).await?;
        parse_comment_page(&body)
    }

    async fn more_children(
        &self,
        post_id: &str,
        children: &[String],
    ) -> Result<Vec<CommentNode>> {
        let link_id = format!("t3_{post_id}");
        let mut nodes = Vec::new();

        for batch in children.chunks(MORE_CHILDREN_BATCH) {
            let ids = batch.join(",");
            let body = self
                .get(
                    "/api/morechildren",
                    &[
                        ("link_id", link_id.as_str()),
                        ("children", ids.as_str()),
                        ("api_type", "json"),
                    ],
                )
                .await?;
            nodes.extend(parse_more_children(&body)?);
        }

        tracing::trace!(post_id, requested = children.len(), "Expanded placeholder");

        Ok(nodes)
    }

    async fn continue_thread(&self, post_id: &str, comment_id: &str) -> Result<Vec<CommentNode>> {
        let body = self
            .get(&format!("/comments/{post_id}/_/{comment_id}"), &[])
            .await?;
        parse_thread_continuation(&body, comment_id)
    }
}

fn log_rate_limit(response: &Response) {
    let remaining = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok());
    if let Some(remaining) = remaining {
        tracing::trace!(remaining, "Rate limit");
    }
}
