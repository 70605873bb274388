//! Local directory cache backend
//!
//! Entries live under `<cache.dir>/<key>`, where the key is derived from the
//! staged manifest's contents. Same manifest = same key = same entry.

use crate::cache::distributor::CacheDistributor;
use crate::config::schema::CacheConfig;
use crate::error::{LockstageError, LockstageResult};
use crate::staging::resolve::join_relative;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Result of looking a key up in the cache directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// An entry exists for `key`
    Hit { key: String, entry: PathBuf },
    /// No entry for `key` yet
    Miss { key: String },
}

impl CacheLookup {
    pub fn key(&self) -> &str {
        match self {
            Self::Hit { key, .. } | Self::Miss { key } => key,
        }
    }
}

/// Restores cache entries from a local directory
#[derive(Debug, Clone)]
pub struct LocalCacheDistributor {
    target_root: PathBuf,
    cache_dir: PathBuf,
    key_prefix: String,
    restore_dir: PathBuf,
}

impl LocalCacheDistributor {
    pub fn new(
        target_root: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
        key_prefix: impl Into<String>,
        restore_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            target_root: target_root.into(),
            cache_dir: cache_dir.into(),
            key_prefix: key_prefix.into(),
            restore_dir: restore_dir.into(),
        }
    }

    /// Build from configuration; the restore dir defaults to the target root
    pub fn from_config(config: &CacheConfig, target_root: &Path) -> Self {
        Self::new(
            target_root,
            config.resolved_dir(),
            config.key_prefix.clone(),
            config
                .restore_dir
                .clone()
                .unwrap_or_else(|| target_root.to_path_buf()),
        )
    }

    /// Cache key for the manifest at `dependency_path`
    pub async fn cache_key(&self, dependency_path: &str) -> LockstageResult<String> {
        let manifest = join_relative(&self.target_root, dependency_path);
        let hash = hash_file_contents(&manifest).await?;
        Ok(format!("{}-{}", self.key_prefix, hash))
    }

    /// Look up the entry for the manifest at `dependency_path`
    pub async fn lookup(&self, dependency_path: &str) -> LockstageResult<CacheLookup> {
        let key = self.cache_key(dependency_path).await?;
        let entry = self.cache_dir.join(&key);

        let is_dir = fs::metadata(&entry)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);

        Ok(if is_dir {
            CacheLookup::Hit { key, entry }
        } else {
            CacheLookup::Miss { key }
        })
    }
}

#[async_trait]
impl CacheDistributor for LocalCacheDistributor {
    async fn restore_cache(&self, dependency_path: &str) -> LockstageResult<()> {
        match self.lookup(dependency_path).await? {
            CacheLookup::Miss { key } => {
                info!("Cache not found for key {}", key);
            }
            CacheLookup::Hit { key, entry } => {
                let restored = copy_tree(&entry, &self.restore_dir).await.map_err(|e| {
                    LockstageError::cache_restore(
                        dependency_path,
                        format!("copying {}: {}", entry.display(), e),
                    )
                })?;
                info!(
                    "Cache restored from key {} ({} files into {})",
                    key,
                    restored,
                    self.restore_dir.display()
                );
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// Hash a manifest's contents using SHA256, returning first 12 hex chars
async fn hash_file_contents(path: &Path) -> LockstageResult<String> {
    let contents = fs::read(path).await.map_err(|e| LockstageError::Io {
        context: format!("reading dependency manifest {}", path.display()),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    let result = hasher.finalize();

    // Take first 12 hex characters (6 bytes)
    Ok(hex::encode(&result[..6]))
}

/// Copy every regular file under `from` into `to`, returning the file count
async fn copy_tree(from: &Path, to: &Path) -> io::Result<usize> {
    let (from, to) = (from.to_path_buf(), to.to_path_buf());
    tokio::task::spawn_blocking(move || copy_tree_blocking(&from, &to))
        .await
        .map_err(io::Error::other)?
}

fn copy_tree_blocking(from: &Path, to: &Path) -> io::Result<usize> {
    std::fs::create_dir_all(to)?;
    let mut copied = 0;

    for entry in WalkDir::new(from) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(from)
            .map_err(io::Error::other)?;
        if rel.as_os_str().is_empty() {
            continue;
        }

        let out = to.join(rel);
        let file_type = entry.file_type();
        if file_type.is_dir() {
            std::fs::create_dir_all(&out)?;
        } else if file_type.is_file() {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &out)?;
            copied += 1;
        } else {
            debug!("Skipping non-regular entry {}", entry.path().display());
        }
    }

    Ok(copied)
}
