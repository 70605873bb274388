//! Cache backend abstraction
//!
//! Mirrors how backends vary per package ecosystem: the staging pipeline
//! talks to a trait object and never to a concrete backend.

use crate::cache::local::LocalCacheDistributor;
use crate::config::schema::CacheConfig;
use crate::error::LockstageResult;
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// Restores a cache keyed on a staged dependency manifest
#[async_trait]
pub trait CacheDistributor: Send + Sync {
    /// Restore the cache for `dependency_path`, relative to the target root
    /// with forward slashes
    async fn restore_cache(&self, dependency_path: &str) -> LockstageResult<()>;

    /// Human-readable backend name for logs
    fn name(&self) -> &'static str;
}

/// Backend used when restoring is turned off
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledDistributor;

#[async_trait]
impl CacheDistributor for DisabledDistributor {
    async fn restore_cache(&self, dependency_path: &str) -> LockstageResult<()> {
        info!("Cache restore disabled, staged {} only", dependency_path);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Create the backend selected by configuration
///
/// # Arguments
/// * `config` - Cache settings
/// * `target_root` - Working tree the dependency path is relative to
/// * `restore` - `false` forces the disabled backend (`--no-restore`)
pub fn create_distributor(
    config: &CacheConfig,
    target_root: &Path,
    restore: bool,
) -> Box<dyn CacheDistributor> {
    if restore && config.enabled {
        Box::new(LocalCacheDistributor::from_config(config, target_root))
    } else {
        Box::new(DisabledDistributor)
    }
}
