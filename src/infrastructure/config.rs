//! Configuration loading.
//!
//! Settings come from an optional TOML file; credentials come from the
//! environment.

use std::fs;
use std::path::Path;

use crate::domain::{AppConfig, AppError, Credentials, Result};

/// Environment variable holding the OAuth client id.
pub const CLIENT_ID_VAR: &str = "REDDIT_CLIENT_ID";
/// Environment variable holding the OAuth client secret.
pub const CLIENT_SECRET_VAR: &str = "REDDIT_CLIENT_SECRET";
/// Environment variable holding the account name used in the user agent.
pub const USERNAME_VAR: &str = "REDDIT_USERNAME";

/// Load configuration from `explicit`, else from the default location.
///
/// A missing default file yields the defaults; a missing explicit file is an
/// error.
///
/// # Errors
/// Returns error if a file exists but cannot be read or parsed.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config_from_file(path);
    }

    let default_path = AppConfig::default_config_path();
    if default_path.exists() {
        load_config_from_file(&default_path)
    } else {
        tracing::debug!(path = %default_path.display(), "No config file, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    let config = toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file {}: {e}", path.display()),
    })?;

    tracing::debug!(path = %path.display(), "Loaded configuration");

    Ok(config)
}

/// Read credentials from the process environment.
#[must_use]
pub fn credentials_from_env() -> Credentials {
    credentials_from(|key| std::env::var(key).ok())
}

/// Build credentials from a variable lookup. Missing values become empty.
pub fn credentials_from(lookup: impl Fn(&str) -> Option<String>) -> Credentials {
    let credentials = Credentials {
        client_id: lookup(CLIENT_ID_VAR).unwrap_or_default(),
        client_secret: lookup(CLIENT_SECRET_VAR).unwrap_or_default(),
        username: lookup(USERNAME_VAR).unwrap_or_default(),
    };

    if credentials.client_id.is_empty() || credentials.client_secret.is_empty() {
        tracing::debug!("Reddit credentials are incomplete; authentication will likely fail");
    }

    credentials
}
