//! Deployment configuration parsing for stratum.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main deployment configuration from stratum.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Deployment name
    pub name: String,

    /// Config version
    #[serde(default = "default_version")]
    pub version: String,

    /// The catalog ("master") database
    pub catalog: CatalogConfig,

    /// Tenant databases, each an isolated migration target
    #[serde(default)]
    pub tenants: Vec<TenantConfig>,

    /// Statement retry policy for transient connectivity failures
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Catalog database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Target id (defaults to `catalog`)
    #[serde(default = "default_catalog_id")]
    pub id: String,

    /// Database file path, or `:memory:`
    pub database: String,

    /// Logical schema name (normalized to lowercase at resolve time)
    #[serde(default = "default_catalog_schema")]
    pub schema: String,
}

/// One tenant database
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantConfig {
    /// Tenant code, used as the target id
    pub id: String,

    /// Database file path, or `:memory:`
    pub database: String,

    /// Logical schema name (normalized to lowercase at resolve time)
    #[serde(default = "default_tenant_schema")]
    pub schema: String,
}

/// Bounded exponential backoff settings for transient statement failures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Attempts per statement, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry; doubles per attempt
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_version() -> String {
    "1".to_string()
}

fn default_catalog_id() -> String {
    "catalog".to_string()
}

fn default_catalog_schema() -> String {
    "master".to_string()
}

fn default_tenant_schema() -> String {
    "tenant".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    100
}

impl Config {
    /// Load and parse a config file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
