//! Staging orchestration
//!
//! Runs resolve -> conflict probe -> copy -> validate strictly in order and,
//! once a manifest is staged, hands its path to the cache backend.

use crate::cache::CacheDistributor;
use crate::error::LockstageResult;
use crate::output::PipelineOutputs;
use crate::staging::conflict::detect_conflict;
use crate::staging::copy::{StageAttempt, StagingCopier};
use crate::staging::fs::StagingFs;
use crate::staging::ids::IdGenerator;
use crate::staging::outcome::{FailureReason, Outcome};
use crate::staging::resolve::{resolve_manifest, ResolutionRoots};
use crate::staging::validate::validate_staged;
use tracing::debug;

/// Default prefix of isolated staging directories
pub const DEFAULT_ISOLATED_PREFIX: &str = "lockstage";

/// Stages a dependency manifest and restores the cache keyed on it
pub struct DependencyStager<'a> {
    fs: &'a dyn StagingFs,
    ids: &'a dyn IdGenerator,
    distributor: &'a dyn CacheDistributor,
    isolated_prefix: &'a str,
    output: Option<(&'a PipelineOutputs, &'a str)>,
}

impl<'a> DependencyStager<'a> {
    pub fn new(
        fs: &'a dyn StagingFs,
        ids: &'a dyn IdGenerator,
        distributor: &'a dyn CacheDistributor,
    ) -> Self {
        Self {
            fs,
            ids,
            distributor,
            isolated_prefix: DEFAULT_ISOLATED_PREFIX,
            output: None,
        }
    }

    /// Use `prefix` for isolated staging directory names
    pub fn with_isolated_prefix(mut self, prefix: &'a str) -> Self {
        self.isolated_prefix = prefix;
        self
    }

    /// Publish the resolved path as output `name` once staged
    pub fn with_output(mut self, outputs: &'a PipelineOutputs, name: &'a str) -> Self {
        self.output = Some((outputs, name));
        self
    }

    /// Stage `manifest` and restore the cache for it.
    ///
    /// Staging problems come back as [`Outcome::Failed`]; the backend is only
    /// invoked for [`Outcome::Staged`]. `Err` means the backend or the output
    /// sink failed.
    pub async fn cache_dependencies(
        &self,
        manifest: &str,
        roots: &ResolutionRoots,
    ) -> LockstageResult<Outcome> {
        let outcome = self.stage(manifest, roots).await;

        let Some(dependency_path) = outcome.dependency_path().map(str::to_string) else {
            return Ok(outcome);
        };

        if let Some((outputs, name)) = self.output {
            outputs.set(name, &dependency_path).await?;
        }

        debug!(
            "Restoring cache for {} via {} backend",
            dependency_path,
            self.distributor.name()
        );
        self.distributor.restore_cache(&dependency_path).await?;

        Ok(outcome)
    }

    /// Stage `manifest` without contacting the cache backend
    pub async fn stage(&self, manifest: &str, roots: &ResolutionRoots) -> Outcome {
        let Some(manifest) = resolve_manifest(manifest, roots) else {
            return Outcome::Skipped;
        };

        let conflict = match manifest.natural_destination(&roots.target_root) {
            Some(destination) => {
                Some(detect_conflict(self.fs, &manifest.source, &destination).await)
            }
            None => None,
        };

        let copier = StagingCopier::new(
            self.fs,
            self.ids,
            &roots.target_root,
            self.isolated_prefix,
        );

        match copier.stage(&manifest, conflict).await {
            StageAttempt::SourceMissing => Outcome::Failed {
                reason: FailureReason::SourceNotFound {
                    path: manifest.source,
                },
            },
            StageAttempt::Attempted { plan, .. } => {
                validate_staged(self.fs, &manifest.source, &roots.target_root, &plan).await
            }
        }
    }
}
