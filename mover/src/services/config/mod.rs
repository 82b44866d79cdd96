use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

use crate::services::errors::MigrationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MigrationConfig {
    pub concurrency: ConcurrencyConfig,
    pub upload: UploadConfig,
    pub storage: StorageConfig,
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// Width of the download worker pool
    pub max_concurrent_fetches: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Ceiling on the cumulative payload size of one upload request.
    /// A single file above the ceiling is still sent, alone.
    pub max_batch_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Prefix of the platform bucket. Resource URLs look like
    /// `<prefix><project id>/<...>/<file name>`.
    pub cloud_resources_url: String,
    /// Prefix of the authorization-gated asset catalog
    pub private_assets_url: String,
    /// URL prefixes for which downloads carry the caller's credentials.
    /// Empty means the two prefixes above.
    pub authenticated_bucket_urls: Vec<String>,
    /// Folder, relative to the project file, downloaded resources are
    /// written to when a project is saved locally
    pub local_assets_folder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub api_base_url: String,
    pub user_agent: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// Query parameter appended to every download to bypass stale CDN entries
    pub cache_bust_param: String,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 20,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_batch_bytes: 50 * 1024 * 1024, // 50MB
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cloud_resources_url: "https://project-resources.example.com/".to_string(),
            private_assets_url: "https://private-assets.example.com/".to_string(),
            authenticated_bucket_urls: Vec::new(),
            local_assets_folder: "assets".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn credentialed_prefixes(&self) -> Vec<&str> {
        if self.authenticated_bucket_urls.is_empty() {
            vec![
                self.cloud_resources_url.as_str(),
                self.private_assets_url.as_str(),
            ]
        } else {
            self.authenticated_bucket_urls
                .iter()
                .map(String::as_str)
                .collect()
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.example.com".to_string(),
            user_agent: "resource-mover/0.1".to_string(),
            connect_timeout_ms: 10_000,
            request_timeout_ms: 300_000, // large videos
            cache_bust_param: "cache_bust".to_string(),
        }
    }
}

impl MigrationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, MigrationError> {
        let config: MigrationConfig =
            serde_json::from_str(json).map_err(|e| MigrationError::Configuration {
                field: "config".to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, MigrationError> {
        let json = std::fs::read_to_string(path).map_err(|e| MigrationError::Configuration {
            field: "config".to_string(),
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), MigrationError> {
        if self.concurrency.max_concurrent_fetches == 0 {
            return Err(invalid(
                "concurrency.max_concurrent_fetches",
                "must be greater than 0",
            ));
        }

        if self.upload.max_batch_bytes == 0 {
            return Err(invalid("upload.max_batch_bytes", "must be greater than 0"));
        }

        if self.storage.cloud_resources_url.is_empty() {
            return Err(invalid("storage.cloud_resources_url", "must not be empty"));
        }

        if self.storage.private_assets_url.is_empty() {
            return Err(invalid("storage.private_assets_url", "must not be empty"));
        }

        if self.storage.local_assets_folder.is_empty() {
            return Err(invalid("storage.local_assets_folder", "must not be empty"));
        }

        if self.network.cache_bust_param.is_empty() {
            return Err(invalid("network.cache_bust_param", "must not be empty"));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> MigrationError {
    MigrationError::Configuration {
        field: field.to_string(),
        message: message.to_string(),
    }
}

static GLOBAL_CONFIG: OnceLock<MigrationConfig> = OnceLock::new();

/// Process-wide defaults, used when a caller doesn't bring its own config
pub fn get_global_config() -> MigrationConfig {
    GLOBAL_CONFIG
        .get_or_init(|| {
            let config = MigrationConfig::default();
            if let Err(e) = config.validate() {
                warn!("Invalid configuration: {}", e);
            }
            config
        })
        .clone()
}
