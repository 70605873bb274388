//! Dependency manifest staging
//!
//! Prepares a manifest that lives outside the working tree (typically in the
//! tool bundle) so a cache backend can hash it from inside the working tree.
//!
//! # Pipeline
//!
//! | Step | Module | Touches disk |
//! |------|--------|--------------|
//! | Resolve source and natural sub-path | [`resolve`] | no |
//! | Probe the natural destination | [`conflict`] | read |
//! | Choose a plan and copy | [`copy`] | write |
//! | Confirm the reported file exists | [`validate`] | read |
//!
//! Only two things end a run with a failure: a source manifest that does not
//! exist, and a staged file that is missing after the copy step. Copy errors
//! by themselves are warnings.
//!
//! # Concurrency
//!
//! Isolated directories embed a fresh UUID, so concurrent runs against the
//! same working tree never share a destination. Nothing in the working tree is
//! ever deleted or overwritten.

pub mod conflict;
pub mod copy;
pub mod fs;
pub mod ids;
pub mod orchestrator;
pub mod outcome;
pub mod resolve;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use conflict::{detect_conflict, Conflict};
pub use copy::{StageAttempt, StagingCopier, StagingPlan};
pub use fs::{LocalFs, StagingFs};
pub use ids::{IdGenerator, UuidGenerator};
pub use orchestrator::{DependencyStager, DEFAULT_ISOLATED_PREFIX};
pub use outcome::{FailureReason, Outcome};
pub use resolve::{resolve_manifest, ResolutionRoots, ResolvedManifest};
pub use validate::validate_staged;
