//! Staging plans and the copy step
//!
//! A manifest lands in the target root in one of three ways:
//!
//! | Plan | When | Reported path |
//! |------|------|---------------|
//! | Natural | natural destination vacant | original sub-path |
//! | Isolated | destination occupied, or no natural sub-path | `<prefix>-<id>/<basename>` |
//! | InPlace | destination is the source itself | original sub-path |
//!
//! Copy failures are logged and swallowed. Whether the run survives them is
//! decided afterwards by [`crate::staging::validate`].

use crate::staging::conflict::Conflict;
use crate::staging::fs::StagingFs;
use crate::staging::ids::IdGenerator;
use crate::staging::resolve::ResolvedManifest;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where a manifest will be placed inside the target root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagingPlan {
    /// Preserve the manifest's sub-path under the target root
    Natural {
        destination: PathBuf,
        relative: String,
    },

    /// Flatten into a fresh `<prefix>-<id>` directory
    Isolated {
        directory: PathBuf,
        destination: PathBuf,
        relative: String,
    },

    /// The manifest already sits at its natural destination
    InPlace {
        destination: PathBuf,
        relative: String,
    },
}

impl StagingPlan {
    /// Absolute destination of the staged manifest
    pub fn destination(&self) -> &Path {
        match self {
            Self::Natural { destination, .. }
            | Self::Isolated { destination, .. }
            | Self::InPlace { destination, .. } => destination,
        }
    }

    /// Forward-slash path relative to the target root
    pub fn relative(&self) -> &str {
        match self {
            Self::Natural { relative, .. }
            | Self::Isolated { relative, .. }
            | Self::InPlace { relative, .. } => relative,
        }
    }

    /// Short label used in logs
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Natural { .. } => "natural",
            Self::Isolated { .. } => "isolated",
            Self::InPlace { .. } => "in-place",
        }
    }
}

/// Result of the staging step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageAttempt {
    /// The source manifest is not a readable file; nothing was copied
    SourceMissing,

    /// A plan was chosen and executed; `copied` is false if the copy failed
    Attempted { plan: StagingPlan, copied: bool },
}

/// Chooses a [`StagingPlan`] and performs the copy
pub struct StagingCopier<'a> {
    fs: &'a dyn StagingFs,
    ids: &'a dyn IdGenerator,
    target_root: &'a Path,
    isolated_prefix: &'a str,
}

impl<'a> StagingCopier<'a> {
    pub fn new(
        fs: &'a dyn StagingFs,
        ids: &'a dyn IdGenerator,
        target_root: &'a Path,
        isolated_prefix: &'a str,
    ) -> Self {
        Self {
            fs,
            ids,
            target_root,
            isolated_prefix,
        }
    }

    /// Decide placement. `conflict` is `None` when the manifest has no
    /// natural sub-path. Returns `None` only if the source has no file name.
    pub fn plan(&self, manifest: &ResolvedManifest, conflict: Option<Conflict>) -> Option<StagingPlan> {
        match (manifest.natural.as_deref(), conflict) {
            (Some(relative), Some(Conflict::Vacant)) => Some(StagingPlan::Natural {
                destination: manifest.natural_destination(self.target_root)?,
                relative: relative.to_string(),
            }),
            (Some(relative), Some(Conflict::SameFile)) => Some(StagingPlan::InPlace {
                destination: manifest.natural_destination(self.target_root)?,
                relative: relative.to_string(),
            }),
            _ => self.isolated_plan(&manifest.source),
        }
    }

    fn isolated_plan(&self, source: &Path) -> Option<StagingPlan> {
        let file_name = source.file_name()?.to_string_lossy().into_owned();
        let dir_name = format!("{}-{}", self.isolated_prefix, self.ids.generate());
        let directory = self.target_root.join(&dir_name);

        Some(StagingPlan::Isolated {
            destination: directory.join(&file_name),
            relative: format!("{}/{}", dir_name, file_name),
            directory,
        })
    }

    /// Check the source, pick a plan and copy.
    pub async fn stage(
        &self,
        manifest: &ResolvedManifest,
        conflict: Option<Conflict>,
    ) -> StageAttempt {
        if !self.fs.is_file(&manifest.source).await {
            warn!(
                "Dependency manifest {} does not exist",
                manifest.source.display()
            );
            return StageAttempt::SourceMissing;
        }

        let Some(plan) = self.plan(manifest, conflict) else {
            warn!(
                "Dependency manifest {} has no file name",
                manifest.source.display()
            );
            return StageAttempt::SourceMissing;
        };

        let copied = match self.execute(&plan, &manifest.source).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Failed to copy {} to {}: {}",
                    manifest.source.display(),
                    plan.destination().display(),
                    e
                );
                false
            }
        };

        StageAttempt::Attempted { plan, copied }
    }

    async fn execute(&self, plan: &StagingPlan, source: &Path) -> io::Result<()> {
        match plan {
            StagingPlan::Natural { destination, .. } => {
                if let Some(parent) = destination.parent() {
                    self.fs.create_dir_all(parent).await?;
                }
                let bytes = self.fs.copy_new(source, destination).await?;
                debug!("Copied {} bytes to {}", bytes, destination.display());
            }
            StagingPlan::Isolated {
                directory,
                destination,
                ..
            } => {
                self.fs.create_dir_all(self.target_root).await?;
                self.fs.create_dir(directory).await?;
                let bytes = self.fs.copy_new(source, destination).await?;
                debug!("Copied {} bytes to {}", bytes, destination.display());
            }
            StagingPlan::InPlace { destination, .. } => {
                debug!("{} is already in place", destination.display());
            }
        }
        Ok(())
    }
}
