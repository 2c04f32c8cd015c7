//! Configuration and context management.
//!
//! Handles:
//! - Board API endpoint configuration
//! - API key/token storage
//! - Current context (selected card)

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Configuration file name.
const CONFIG_FILE: &str = "config.json";

/// Credentials file name.
const CREDENTIALS_FILE: &str = "credentials.json";

/// Get the config directory path.
fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "runtrack", "wj")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// Get the data directory path (card storage lives here).
fn data_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "runtrack", "wj")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
}

/// Path of the storage file backing one card's key/value map.
pub fn card_store_path(card_id: &str) -> Result<PathBuf> {
    Ok(data_dir()?.join("cards").join(format!("{card_id}.json")))
}

/// Path of the cached card snapshot for one card, if any was saved.
pub fn card_snapshot_path(card_id: &str) -> Result<PathBuf> {
    Ok(data_dir()?.join("cards").join(format!("{card_id}.card.json")))
}

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Board API endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Current context.
    #[serde(default)]
    pub context: CliContext,
}

fn default_api_url() -> String {
    std::env::var("WJ_API_URL").unwrap_or_else(|_| runtrack_store::DEFAULT_API_BASE.to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            context: CliContext::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return default.
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join(CONFIG_FILE);

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Get the API URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        let dir = config_dir()?;
        fs::create_dir_all(&dir)?;

        let path = dir.join(CONFIG_FILE);
        let contents = serde_json::to_string_pretty(self)?;

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;

            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)?;
            file.write_all(contents.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&path, contents)
                .with_context(|| format!("Failed to write config to {:?}", path))
                .map(|_| ())?;
        }

        Ok(())
    }
}

/// Current CLI context (selected card).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliContext {
    /// Current card ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
}

/// Stored board API credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// API key.
    pub key: String,

    /// API token.
    pub token: String,

    /// When the credentials were saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Credentials {
    /// Create new credentials stamped with the current time.
    pub fn new(key: String, token: String) -> Self {
        Self {
            key,
            token,
            authorized_at: Some(chrono::Utc::now()),
        }
    }

    /// Load credentials from disk.
    pub fn load() -> Result<Option<Self>> {
        let path = config_dir()?.join(CREDENTIALS_FILE);

        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read credentials from {:?}", path))?;

        let creds: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse credentials from {:?}", path))?;

        Ok(Some(creds))
    }

    /// Save credentials to disk.
    pub fn save(&self) -> Result<()> {
        let dir = config_dir()?;
        fs::create_dir_all(&dir)?;

        let path = dir.join(CREDENTIALS_FILE);
        let contents = serde_json::to_string_pretty(self)?;

        // Set restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)?;
            use std::io::Write;
            file.write_all(contents.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&path, contents)
                .with_context(|| format!("Failed to write credentials to {:?}", path))
                .map(|_| ())?;
        }

        Ok(())
    }

    /// Delete credentials from disk.
    pub fn delete() -> Result<()> {
        let path = config_dir()?.join(CREDENTIALS_FILE);

        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete credentials at {:?}", path))?;
        }

        Ok(())
    }

    /// Key with all but the last four characters hidden, for status output.
    pub fn masked_key(&self) -> String {
        let visible = self.key.len().saturating_sub(4);
        let tail = &self.key[visible..];
        format!("{}{}", "*".repeat(visible.min(12)), tail)
    }
}
