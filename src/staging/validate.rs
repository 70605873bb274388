//! Post-copy validation

use crate::staging::copy::StagingPlan;
use crate::staging::fs::StagingFs;
use crate::staging::outcome::{FailureReason, Outcome};
use crate::staging::resolve::join_relative;
use std::path::Path;
use tracing::{error, info};

/// Confirm a file exists at the path that will be reported.
///
/// This is where a tolerated copy failure is adjudicated: a file left at the
/// destination by an earlier step is as good as a fresh copy.
pub async fn validate_staged(
    fs: &dyn StagingFs,
    source: &Path,
    target_root: &Path,
    plan: &StagingPlan,
) -> Outcome {
    let reported = join_relative(target_root, plan.relative());

    if fs.is_file(&reported).await {
        info!(
            "Staged dependency manifest {} -> {} ({})",
            source.display(),
            reported.display(),
            plan.mode()
        );
        info!("Resolved cache dependency path: {}", plan.relative());
        Outcome::Staged {
            dependency_path: plan.relative().to_string(),
        }
    } else {
        error!(
            "Staged dependency manifest missing at {}",
            reported.display()
        );
        Outcome::Failed {
            reason: FailureReason::NotMaterialized { path: reported },
        }
    }
}
