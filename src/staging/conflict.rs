//! Destination conflict detection

use crate::staging::fs::StagingFs;
use std::path::Path;
use tracing::debug;

/// What occupies a manifest's natural destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// Nothing there, the manifest can be copied in
    Vacant,
    /// An unrelated entry already exists
    Occupied,
    /// The destination is the source manifest itself
    SameFile,
}

/// Probe the natural destination of `source`.
///
/// Only presence matters; contents are never read. A probe error other than
/// "not found" counts as occupied.
pub async fn detect_conflict(fs: &dyn StagingFs, source: &Path, destination: &Path) -> Conflict {
    match fs.try_exists(destination).await {
        Ok(false) => Conflict::Vacant,
        Ok(true) if fs.same_file(source, destination).await => Conflict::SameFile,
        Ok(true) => {
            debug!("Natural destination {} is occupied", destination.display());
            Conflict::Occupied
        }
        Err(e) => {
            debug!(
                "Could not probe {} ({}), treating as occupied",
                destination.display(),
                e
            );
            Conflict::Occupied
        }
    }
}
