//! Manifest path resolution
//!
//! Turns the caller's manifest reference into the absolute source path and
//! the natural sub-path it would occupy inside the target root. Pure: no
//! filesystem access happens here.

use std::path::{Path, PathBuf};

/// The two directories a manifest is resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRoots {
    /// Where the manifest physically lives (the tool bundle)
    pub source_root: PathBuf,

    /// The working tree the cache backend operates on
    pub target_root: PathBuf,
}

impl ResolutionRoots {
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
        }
    }
}

/// A manifest reference resolved against [`ResolutionRoots`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedManifest {
    /// Absolute path of the manifest to stage
    pub source: PathBuf,

    /// Forward-slash sub-path under the target root, if the reference stays
    /// inside its root
    pub natural: Option<String>,
}

impl ResolvedManifest {
    /// Absolute natural destination under `target_root`
    pub fn natural_destination(&self, target_root: &Path) -> Option<PathBuf> {
        self.natural
            .as_deref()
            .map(|relative| join_relative(target_root, relative))
    }
}

/// Resolve a manifest reference.
///
/// Returns `None` when the reference is empty, which disables staging.
/// Both `/` and `\` separate segments so references behave the same on every
/// host. Absolute references, and references whose `..` segments climb out of
/// the root, have no natural sub-path.
pub fn resolve_manifest(reference: &str, roots: &ResolutionRoots) -> Option<ResolvedManifest> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    if is_absolute_reference(reference) {
        return Some(ResolvedManifest {
            source: PathBuf::from(reference),
            natural: None,
        });
    }

    let mut source = roots.source_root.clone();
    let mut normalized: Vec<&str> = Vec::new();
    let mut escapes = false;

    for segment in reference.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                source.push(segment);
                if normalized.pop().is_none() {
                    escapes = true;
                }
            }
            _ => {
                source.push(segment);
                normalized.push(segment);
            }
        }
    }

    let natural = if escapes || normalized.is_empty() {
        None
    } else {
        Some(normalized.join("/"))
    };

    Some(ResolvedManifest { source, natural })
}

/// Join a forward-slash relative path onto `root` segment by segment
pub fn join_relative(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

fn is_absolute_reference(reference: &str) -> bool {
    if reference.starts_with('/') || reference.starts_with('\\') {
        return true;
    }
    // Windows drive prefix, e.g. `C:\deps\poetry.lock`; `a:poetry.lock` stays relative
    let bytes = reference.as_bytes();
    if bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && matches!(bytes[2], b'/' | b'\\')
    {
        return true;
    }
    Path::new(reference).is_absolute()
}
