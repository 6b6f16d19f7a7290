use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub drive: DriveConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DriveConfig {
    /// Path to the service-account key JSON. When unset, the key is read
    /// from the `GOOGLE_SERVICE_ACCOUNT_KEY` environment variable instead.
    pub key_file: Option<PathBuf>,
    /// Pre-issued OAuth bearer token. Skips the service-account flow
    /// entirely; meant for tests and short-lived tooling.
    pub access_token: Option<String>,
    /// Override the Google API origin (proxies, test doubles).
    pub endpoint_url: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            key_file: None,
            access_token: None,
            endpoint_url: None,
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    1000
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ContentConfig {
    pub posts_folder_id: Option<String>,
    pub post_thumbnails_folder_id: Option<String>,
    pub projects_folder_id: Option<String>,
    pub project_thumbnails_folder_id: Option<String>,
    pub resume_file_id: Option<String>,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate drive settings
    if config.drive.page_size == 0 || config.drive.page_size > 1000 {
        anyhow::bail!("drive.page_size must be between 1 and 1000");
    }

    if let Some(ref endpoint) = config.drive.endpoint_url {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            anyhow::bail!("drive.endpoint_url must start with http:// or https://");
        }
    }

    Ok(config)
}
