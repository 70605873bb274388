//! Lockstage settings: where they live and how they are read
//!
//! A missing file means defaults. A file that parses but fails
//! [`Config::validate`] is rejected before any staging starts.

pub mod schema;

pub use schema::Config;

use crate::error::{LockstageError, LockstageResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Reads and writes the TOML settings file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Settings at `~/.config/lockstage/config.toml` (platform config dir)
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Settings at `path`, e.g. from `--config` or `LOCKSTAGE_CONFIG`
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lockstage")
            .join("config.toml")
    }

    /// Settings for this run; defaults when no file exists
    pub async fn load(&self) -> LockstageResult<Config> {
        if !self.config_path.exists() {
            debug!("No config at {}, using defaults", self.config_path.display());
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Parse `path` and reject prefixes or output names that cannot be staged
    pub async fn load_from_file(&self, path: &Path) -> LockstageResult<Config> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            LockstageError::io(format!("reading config from {}", path.display()), e)
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| LockstageError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write `config` in full, used by `config init`
    pub async fn save(&self, config: &Config) -> LockstageResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            LockstageError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    async fn ensure_config_dir(&self) -> LockstageResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| LockstageError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
