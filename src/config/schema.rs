//! Configuration schema for Lockstage
//!
//! Configuration is stored at `~/.config/lockstage/config.toml`

use crate::error::{LockstageError, LockstageResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Manifest staging settings
    pub staging: StagingConfig,

    /// Cache backend settings
    pub cache: CacheConfig,
}

impl Config {
    /// Check values that serde cannot check on its own
    pub fn validate(&self) -> LockstageResult<()> {
        validate_prefix("staging.isolated_prefix", &self.staging.isolated_prefix)?;
        validate_prefix("cache.key_prefix", &self.cache.key_prefix)?;

        if self.staging.output_name.trim().is_empty() || self.staging.output_name.contains('=') {
            return Err(LockstageError::InvalidSetting {
                field: "staging.output_name",
                reason: format!("'{}' is not a usable output name", self.staging.output_name),
            });
        }

        match self.general.log_format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(LockstageError::InvalidSetting {
                field: "general.log_format",
                reason: format!("expected \"text\" or \"json\", got \"{}\"", other),
            }),
        }
    }
}

/// Prefixes end up as directory names and cache keys.
fn validate_prefix(field: &'static str, value: &str) -> LockstageResult<()> {
    if value.is_empty() {
        return Err(LockstageError::InvalidSetting {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    if value.contains('/') || value.contains('\\') || value.contains("..") || value.contains('\0')
    {
        return Err(LockstageError::InvalidSetting {
            field,
            reason: format!("'{}' must not contain path separators or '..'", value),
        });
    }
    Ok(())
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Manifest staging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    /// Prefix of isolated staging directories (`<prefix>-<uuid>`)
    pub isolated_prefix: String,

    /// Name of the pipeline output carrying the resolved path
    pub output_name: String,

    /// Publish the resolved path as a pipeline output
    pub publish_output: bool,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            isolated_prefix: "lockstage".to_string(),
            output_name: "cache-dependency-path".to_string(),
            publish_output: true,
        }
    }
}

/// Cache backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Restore caches after staging (default: true)
    pub enabled: bool,

    /// Directory holding cache entries (default: `<cache_dir>/lockstage`)
    pub dir: Option<PathBuf>,

    /// Prefix of cache keys (`<prefix>-<hash>`)
    pub key_prefix: String,

    /// Where restored entries are copied to (default: the target root)
    pub restore_dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
            key_prefix: "lockstage".to_string(),
            restore_dir: None,
        }
    }
}

impl CacheConfig {
    /// Cache entry directory, falling back to the platform cache dir
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("lockstage")
        })
    }
}
