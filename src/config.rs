//! Configuration loading and management.
//!
//! Loads configuration from embedded config.toml (or a user-supplied file) with
//! environment variable overrides. The resulting `Config` is built once and
//! passed by reference into the authenticator and the Graph client.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::auth::secure::SecureString;

/// Embedded configuration file content.
const CONFIG_TOML: &str = include_str!("../config.toml");

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Informational cloud label shown with the tenant banner.
    #[serde(default)]
    pub environment: String,
    pub b2c: Credentials,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

/// Service principal credentials for the B2C tenant.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub tenant: String,
    /// OAuth authority, e.g. `https://login.microsoftonline.com/contoso.onmicrosoft.com`.
    pub authority: String,
    pub client_id: String,
    pub client_secret: SecureString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Graph base URL; the tenant is appended directly to it.
    pub graph_endpoint: String,
    /// Resource the client-credentials scope is derived from.
    pub graph_resource: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load configuration with environment variable overrides.
    ///
    /// Source order: `path` if given, then the per-user config file if it exists,
    /// then the embedded defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, user_config_path(), |key| env::var(key).ok())
    }

    /// `load` with the per-user path and the override lookup supplied by the caller.
    pub fn load_from(
        path: Option<&Path>,
        user_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let source = match path {
            Some(p) => read_config_file(p)?,
            None => match user_path.filter(|p| p.exists()) {
                Some(p) => read_config_file(&p)?,
                None => CONFIG_TOML.to_string(),
            },
        };

        let mut config = Self::parse(&source)?;

        // Apply environment variable overrides
        config.apply_overrides(lookup);

        // Validate required fields
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML document into a `Config` without overrides or validation.
    pub fn parse(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse config.toml")
    }

    /// Apply overrides from a key lookup (the process environment in `load`).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(tenant) = lookup("B2C_TENANT") {
            self.b2c.tenant = tenant;
        }

        if let Some(authority) = lookup("B2C_AUTHORITY") {
            self.b2c.authority = authority;
        }

        if let Some(client_id) = lookup("B2C_CLIENT_ID") {
            self.b2c.client_id = client_id;
        }

        if let Some(secret) = lookup("B2C_CLIENT_SECRET") {
            self.b2c.client_secret = SecureString::new(secret);
        }

        if let Some(environment) = lookup("B2C_ENVIRONMENT") {
            self.environment = environment;
        }

        if let Some(endpoint) = lookup("B2C_GRAPH_ENDPOINT") {
            self.api.graph_endpoint = endpoint;
        }

        if let Some(resource) = lookup("B2C_GRAPH_RESOURCE") {
            self.api.graph_resource = resource;
        }
    }

    /// Validate that required configuration is present.
    pub fn validate(&self) -> Result<()> {
        if is_placeholder(&self.b2c.tenant) {
            anyhow::bail!(
                "B2C tenant not configured. Set B2C_TENANT environment variable \
                 or update config.toml"
            );
        }

        if is_placeholder(&self.b2c.client_id) {
            anyhow::bail!(
                "B2C client_id not configured. Set B2C_CLIENT_ID environment variable \
                 or update config.toml"
            );
        }

        if is_placeholder(self.b2c.client_secret.as_str()) {
            anyhow::bail!(
                "B2C client_secret not configured. Set B2C_CLIENT_SECRET environment variable \
                 or update config.toml"
            );
        }

        if is_placeholder(&self.b2c.authority) {
            anyhow::bail!(
                "B2C authority not configured. Set B2C_AUTHORITY environment variable \
                 or update config.toml"
            );
        }

        require_http_url("authority", &self.b2c.authority)?;
        require_http_url("graph_endpoint", &self.api.graph_endpoint)?;

        Ok(())
    }
}

/// Per-user config file, e.g. `~/.config/b2cgraph/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("b2cgraph").join("config.toml"))
}

fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))
}

fn is_placeholder(value: &str) -> bool {
    value.trim().is_empty() || value.contains("YOUR_")
}

fn require_http_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).with_context(|| format!("Invalid {} URL: {}", name, value))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("Invalid {} URL (expected http or https): {}", name, value);
    }
    Ok(())
}
