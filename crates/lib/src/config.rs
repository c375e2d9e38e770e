//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.pagebot/config.json`) and environment.
//! Tokens from the environment take precedence over the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const PAGE_ACCESS_TOKEN_ENV: &str = "PAGE_ACCESS_TOKEN";
const VERIFY_TOKEN_ENV: &str = "MESSENGER_VERIFY_TOKEN";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Messenger platform settings (tokens, Graph API endpoint).
    #[serde(default)]
    pub messenger: MessengerConfig,
}

/// Bind address and port for the webhook server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for HTTP (default 8000).
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0"; the platform must reach the webhook from outside).
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

fn default_server_port() -> u16 {
    8000
}

fn default_server_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_server_bind(),
        }
    }
}

/// Messenger channel config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessengerConfig {
    /// Page access token for the Send API. Overridden by PAGE_ACCESS_TOKEN env when set.
    #[serde(default)]
    pub page_access_token: Option<String>,
    /// Shared secret for the subscription handshake. Overridden by MESSENGER_VERIFY_TOKEN env when set.
    #[serde(default)]
    pub verify_token: Option<String>,
    /// Graph API base URL (default "https://graph.facebook.com").
    #[serde(default = "default_graph_api_base")]
    pub graph_api_base: String,
    /// Graph API version segment (default "v2.6").
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_graph_api_base() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_api_version() -> String {
    "v2.6".to_string()
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            page_access_token: None,
            verify_token: None,
            graph_api_base: default_graph_api_base(),
            api_version: default_api_version(),
        }
    }
}

/// Env value if set and non-empty, otherwise the trimmed config value if non-empty.
fn env_or_config(env_key: &str, configured: Option<&String>) -> Option<String> {
    std::env::var(env_key)
        .ok()
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            configured
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve the page access token: env PAGE_ACCESS_TOKEN overrides config.
pub fn resolve_page_access_token(config: &Config) -> Option<String> {
    env_or_config(
        PAGE_ACCESS_TOKEN_ENV,
        config.messenger.page_access_token.as_ref(),
    )
}

/// Resolve the webhook verify token: env MESSENGER_VERIFY_TOKEN overrides config.
pub fn resolve_verify_token(config: &Config) -> Option<String> {
    env_or_config(VERIFY_TOKEN_ENV, config.messenger.verify_token.as_ref())
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("PAGEBOT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".pagebot").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path (or the default). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

/// Create the config directory and write a default `config.json` if none exists.
/// Returns the config directory.
pub fn init_config_file(config_path: &std::path::Path) -> Result<PathBuf> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;

    if !config_path.exists() {
        let body = serde_json::to_string_pretty(&Config::default())
            .context("serializing default config")?;
        std::fs::write(config_path, body)
            .with_context(|| format!("writing default config to {}", config_path.display()))?;
        log::info!("created default config at {}", config_path.display());
    } else {
        log::debug!(
            "config already exists at {}, skipping",
            config_path.display()
        );
    }
    Ok(config_dir.to_path_buf())
}
