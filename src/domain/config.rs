//! Configuration models.
//!
//! File-backed settings (API endpoints, limits, output directory) and the
//! environment-supplied Reddit credentials.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Reddit API endpoints and HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    /// Base URL for authenticated API calls.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// OAuth token endpoint.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            auth_url: default_auth_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RedditConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_api_base_url() -> String {
    "https://oauth.reddit.com".to_string()
}

fn default_auth_url() -> String {
    "https://www.reddit.com/api/v1/access_token".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

/// Collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectConfig {
    /// Maximum number of submissions to request.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Cap on "more comments" placeholders expanded per submission.
    /// Unset expands all of them.
    #[serde(default)]
    pub more_limit: Option<usize>,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            more_limit: None,
        }
    }
}

const fn default_limit() -> usize {
    100
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for the exported files; current directory when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub reddit: RedditConfig,

    #[serde(default)]
    pub collect: CollectConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".subreddit-harvest")
    }

    /// Default config file location.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Directory the export files are written to.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Script-app credentials, taken from the environment as-is.
///
/// Empty values are not rejected here; the token endpoint rejects them.
#[derive(Clone, Default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

impl Credentials {
    /// User agent in the form Reddit asks script apps to send.
    #[must_use]
    pub fn user_agent(&self) -> String {
        format!(
            "script:{}:{} (by u/{})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            self.username
        )
    }
}
