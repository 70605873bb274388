//! Pipeline outputs
//!
//! Appends `name=value` lines to the file named by `GITHUB_OUTPUT` (or
//! `--output-file`) so later pipeline steps can read the resolved path.

use crate::error::{LockstageError, LockstageResult};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Sink for named step outputs
#[derive(Debug, Clone, Default)]
pub struct PipelineOutputs {
    path: Option<PathBuf>,
}

impl PipelineOutputs {
    /// Write to `path`; `None` disables publishing
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Output file, if publishing is enabled
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Publish `name=value`
    pub async fn set(&self, name: &str, value: &str) -> LockstageResult<()> {
        validate(name, value)?;

        let Some(path) = &self.path else {
            debug!("No output file configured, not publishing {}", name);
            return Ok(());
        };

        append(path, &format!("{}={}\n", name, value))
            .await
            .map_err(|e| LockstageError::io(format!("writing output {} to {}", name, path.display()), e))?;

        debug!("Published output {}={}", name, value);
        Ok(())
    }
}

fn validate(name: &str, value: &str) -> LockstageResult<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.contains('=') || name.contains('\n') || name.contains('\r') {
        Some("name contains '=' or a line break")
    } else if value.contains('\n') || value.contains('\r') {
        Some("value contains a line break")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(LockstageError::OutputValue {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

async fn append(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}
