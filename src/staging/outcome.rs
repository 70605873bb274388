//! Terminal results of a staging run

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// How a staging run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// No manifest was configured
    Skipped,

    /// The manifest is on disk at `dependency_path` (relative to the target
    /// root, forward slashes)
    Staged { dependency_path: String },

    /// The run cannot continue
    Failed { reason: FailureReason },
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The resolved dependency path, if staging succeeded
    pub fn dependency_path(&self) -> Option<&str> {
        match self {
            Self::Staged { dependency_path } => Some(dependency_path),
            _ => None,
        }
    }
}

/// Why a staging run failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The manifest was never there
    SourceNotFound { path: PathBuf },

    /// A copy was attempted but no file exists where it should be
    NotMaterialized { path: PathBuf },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNotFound { path } => {
                write!(f, "Dependency manifest {} does not exist", path.display())
            }
            Self::NotMaterialized { path } => write!(
                f,
                "Staged dependency manifest did not materialize at {}",
                path.display()
            ),
        }
    }
}
