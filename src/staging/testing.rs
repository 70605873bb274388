//! Test doubles for the staging pipeline

use crate::cache::CacheDistributor;
use crate::error::{LockstageError, LockstageResult};
use crate::staging::fs::{LocalFs, StagingFs};
use crate::staging::ids::IdGenerator;
use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Always returns the same identifier
pub struct FixedId(String);

impl FixedId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl IdGenerator for FixedId {
    fn generate(&self) -> String {
        self.0.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CopyBehavior {
    Copy,
    Fail,
    SeedThenFail,
}

/// [`LocalFs`] that counts calls and can make copies fail
pub struct RecordingFs {
    behavior: CopyBehavior,
    calls: AtomicUsize,
    copies: AtomicUsize,
}

impl RecordingFs {
    fn with(behavior: CopyBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            copies: AtomicUsize::new(0),
        }
    }

    pub fn new() -> Self {
        Self::with(CopyBehavior::Copy)
    }

    /// Every copy fails with a permission error
    pub fn failing() -> Self {
        Self::with(CopyBehavior::Fail)
    }

    /// Every copy fails, but only after another writer has put a file at the
    /// destination
    pub fn failing_after_seed() -> Self {
        Self::with(CopyBehavior::SeedThenFail)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn copy_calls(&self) -> usize {
        self.copies.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StagingFs for RecordingFs {
    async fn try_exists(&self, path: &Path) -> io::Result<bool> {
        self.record();
        LocalFs.try_exists(path).await
    }

    async fn is_file(&self, path: &Path) -> bool {
        self.record();
        LocalFs.is_file(path).await
    }

    async fn same_file(&self, a: &Path, b: &Path) -> bool {
        self.record();
        LocalFs.same_file(a, b).await
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.record();
        LocalFs.create_dir_all(path).await
    }

    async fn create_dir(&self, path: &Path) -> io::Result<()> {
        self.record();
        LocalFs.create_dir(path).await
    }

    async fn copy_new(&self, from: &Path, to: &Path) -> io::Result<u64> {
        self.record();
        self.copies.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            CopyBehavior::Copy => LocalFs.copy_new(from, to).await,
            CopyBehavior::Fail => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only staging root",
            )),
            CopyBehavior::SeedThenFail => {
                tokio::fs::write(to, "seeded by an earlier step").await?;
                Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "read-only staging root",
                ))
            }
        }
    }
}

/// Filesystem whose existence probes always error
pub struct UnprobeableFs;

#[async_trait]
impl StagingFs for UnprobeableFs {
    async fn try_exists(&self, _path: &Path) -> io::Result<bool> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "no access"))
    }

    async fn is_file(&self, path: &Path) -> bool {
        LocalFs.is_file(path).await
    }

    async fn same_file(&self, a: &Path, b: &Path) -> bool {
        LocalFs.same_file(a, b).await
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        LocalFs.create_dir_all(path).await
    }

    async fn create_dir(&self, path: &Path) -> io::Result<()> {
        LocalFs.create_dir(path).await
    }

    async fn copy_new(&self, from: &Path, to: &Path) -> io::Result<u64> {
        LocalFs.copy_new(from, to).await
    }
}

/// Records every dependency path it is asked to restore
#[derive(Default)]
pub struct RecordingDistributor {
    restored: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingDistributor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn restored(&self) -> Vec<String> {
        self.restored.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheDistributor for RecordingDistributor {
    async fn restore_cache(&self, dependency_path: &str) -> LockstageResult<()> {
        self.restored
            .lock()
            .unwrap()
            .push(dependency_path.to_string());
        if self.fail {
            return Err(LockstageError::cache_restore(dependency_path, "backend down"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
