//! Filesystem abstraction used by the staging pipeline
//!
//! Every filesystem touch made while staging a manifest goes through
//! [`StagingFs`], so one invocation performs its probes and writes strictly in
//! sequence and tests can substitute failing or counting implementations.

use async_trait::async_trait;
use std::io;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Filesystem operations the staging pipeline needs
#[async_trait]
pub trait StagingFs: Send + Sync {
    /// Whether anything exists at `path`. "Not found" is `Ok(false)`.
    async fn try_exists(&self, path: &Path) -> io::Result<bool>;

    /// Whether `path` is an existing regular file (following symlinks)
    async fn is_file(&self, path: &Path) -> bool;

    /// Whether both paths resolve to the same file on disk
    async fn same_file(&self, a: &Path, b: &Path) -> bool;

    /// Create a directory and all missing parents
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create a single directory; fails if it already exists
    async fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Copy `from` into a new file at `to`; fails if `to` already exists
    async fn copy_new(&self, from: &Path, to: &Path) -> io::Result<u64>;
}

/// [`StagingFs`] backed by `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait]
impl StagingFs for LocalFs {
    async fn try_exists(&self, path: &Path) -> io::Result<bool> {
        fs::try_exists(path).await
    }

    async fn is_file(&self, path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn same_file(&self, a: &Path, b: &Path) -> bool {
        match (fs::canonicalize(a).await, fs::canonicalize(b).await) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path).await
    }

    async fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path).await
    }

    async fn copy_new(&self, from: &Path, to: &Path) -> io::Result<u64> {
        let mut source = fs::File::open(from).await?;
        let mut dest = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(to)
            .await?;

        let copied = match tokio::io::copy(&mut source, &mut dest).await {
            Ok(n) => dest.flush().await.map(|_| n),
            Err(e) => Err(e),
        };

        // The destination was created above, so a partial file is ours to drop.
        if copied.is_err() {
            drop(dest);
            let _ = fs::remove_file(to).await;
        }
        copied
    }
}
