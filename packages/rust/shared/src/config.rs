//! Application configuration for catalogsync.
//!
//! User config lives at `~/.catalogsync/catalogsync.toml`.
//! CLI flags and environment variables override config file values,
//! which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CatalogError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "catalogsync.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".catalogsync";

// ---------------------------------------------------------------------------
// Config structs (matching catalogsync.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Source catalog settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Target store settings.
    #[serde(default)]
    pub store: StoreConfig,
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Endpoint returning the product catalog as a JSON array.
    #[serde(default = "default_source_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_source_url() -> String {
    "https://fakestoreapi.com/products".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[store]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the target content store.
    #[serde(default = "default_store_url")]
    pub base_url: String,

    /// Path prefix of the store's REST API.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Send a URL-safe slug alongside each category name.
    #[serde(default)]
    pub category_slugs: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_store_url(),
            api_prefix: default_api_prefix(),
            category_slugs: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_store_url() -> String {
    "http://localhost:1337".into()
}
fn default_api_prefix() -> String {
    "/api".into()
}

// ---------------------------------------------------------------------------
// Import config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime import configuration, validated and ready for the pipeline.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Catalog endpoint.
    pub source_url: Url,
    /// Timeout for catalog and image downloads, in seconds.
    pub source_timeout_secs: u64,
    /// Target store base URL.
    pub store_url: Url,
    /// Store API path prefix (e.g. `/api`).
    pub api_prefix: String,
    /// Whether category create requests carry a slug.
    pub category_slugs: bool,
    /// Timeout for store requests, in seconds.
    pub store_timeout_secs: u64,
}

impl TryFrom<&AppConfig> for ImportConfig {
    type Error = CatalogError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            source_url: parse_http_url("source.url", &config.source.url)?,
            source_timeout_secs: config.source.timeout_secs,
            store_url: parse_http_url("store.base_url", &config.store.base_url)?,
            api_prefix: config.store.api_prefix.clone(),
            category_slugs: config.store.category_slugs,
            store_timeout_secs: config.store.timeout_secs,
        })
    }
}

/// Parse `value` as an absolute http(s) URL, naming `field` in the error.
fn parse_http_url(field: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value)
        .map_err(|e| CatalogError::config(format!("{field}: invalid URL '{value}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CatalogError::config(format!(
            "{field}: unsupported scheme '{other}', expected http or https"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.catalogsync/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CatalogError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.catalogsync/catalogsync.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CatalogError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_dir()?.join(CONFIG_FILE_NAME);
    init_config_at(&path)?;
    Ok(path)
}

/// Write a default config file at `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| CatalogError::io(dir, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| CatalogError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| CatalogError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}
