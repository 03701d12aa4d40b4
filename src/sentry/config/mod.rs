//! Sentry configuration
//!
//! Loads configuration from `~/.config/sentry-mcp/settings.toml`, then lets
//! `SENTRY_*` environment variables override it. The result is loaded once at
//! startup and handed to the client explicitly.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};


const DEFAULT_HOST: &str = "sentry.io";
const DEFAULT_PROTOCOL: &str = "https";

/// Sentry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentryConfig {
    /// Auth token
    pub auth_token: Option<String>,
    /// Organization slug
    pub organization: Option<String>,
    /// Sentry host, for self-hosted installs
    pub host: Option<String>,
    /// `https` or `http`
    pub protocol: Option<String>,
}

impl SentryConfig {
    /// Check if configured with auth token
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.auth_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn protocol(&self) -> &str {
        self.protocol.as_deref().unwrap_or(DEFAULT_PROTOCOL)
    }

    /// Base URL of the REST API
    pub fn api_base(&self) -> String {
        format!("{}://{}/api/0", self.protocol(), self.host())
    }

    /// Apply environment overrides from a lookup function
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(token) = var("SENTRY_AUTH_TOKEN") {
            self.auth_token = Some(token);
        }
        if let Some(org) = var("SENTRY_ORG") {
            self.organization = Some(org);
        }
        if let Some(host) = var("SENTRY_HOST") {
            self.host = Some(host);
        }
        if let Some(protocol) = var("SENTRY_PROTOCOL") {
            self.protocol = Some(protocol);
        }
    }
}

/// Settings file structure
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    sentry: Option<SentryConfig>,
}

/// Get path to config file
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join("sentry-mcp").join("settings.toml"))
}

/// Load Sentry config from settings file and environment
pub fn load_config() -> Result<SentryConfig> {
    let mut config = match config_path() {
        Some(path) => load_config_from(&path)?,
        None => SentryConfig::default(),
    };
    config.apply_env(|name| std::env::var(name).ok());
    Ok(config)
}

/// Load config from a specific file; a missing file yields defaults
pub fn load_config_from(path: &Path) -> Result<SentryConfig> {
    if !path.exists() {
        return Ok(SentryConfig::default());
    }
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse config from TOML string
fn parse_config(contents: &str) -> Result<SentryConfig> {
    let settings: SettingsFile = toml::from_str(contents)?;
    Ok(settings.sentry.unwrap_or_default())
}

/// Save auth token to config file
pub fn save_auth_token(token: &str, org: &str) -> Result<()> {
    let path = config_path().ok_or_else(|| anyhow::anyhow!("Cannot determine config directory"))?;
    save_auth_token_to(&path, token, org)
}

/// Save auth token to a specific file, keeping everything else in it
pub fn save_auth_token_to(path: &Path, token: &str, org: &str) -> Result<()> {
    // Read existing or create new
    let contents = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let output = update_config_toml(&contents, token, org)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, output)?;
    Ok(())
}

/// Update TOML config with new token and organization
fn update_config_toml(contents: &str, token: &str, org: &str) -> Result<String> {
    let mut doc: toml::Value =
        toml::from_str(contents).context("Existing settings file is not valid TOML")?;

    let table = doc
        .as_table_mut()
        .ok_or_else(|| anyhow::anyhow!("Config is not a table"))?;

    let sentry = table
        .entry("sentry")
        .or_insert(toml::Value::Table(toml::map::Map::new()))
        .as_table_mut()
        .ok_or_else(|| anyhow::anyhow!("sentry section is not a table"))?;

    sentry.insert(
        "auth_token".to_string(),
        toml::Value::String(token.to_string()),
    );
    sentry.insert(
        "organization".to_string(),
        toml::Value::String(org.to_string()),
    );

    toml::to_string_pretty(&doc).map_err(Into::into)
}
