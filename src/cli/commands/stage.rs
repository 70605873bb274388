//! Stage command - stage a dependency manifest and restore its cache

use crate::cache::create_distributor;
use crate::cli::args::{OutputFormat, StageArgs};
use crate::config::Config;
use crate::error::{LockstageError, LockstageResult};
use crate::output::PipelineOutputs;
use crate::staging::{DependencyStager, LocalFs, Outcome, ResolutionRoots, UuidGenerator};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fallback for the source root when `--source-root` is not given
const SOURCE_ROOT_FALLBACK_VAR: &str = "GITHUB_ACTION_PATH";

/// Fallback for the target root when `--target-root` is not given
const TARGET_ROOT_FALLBACK_VAR: &str = "GITHUB_WORKSPACE";

/// Execute the stage command
pub async fn execute(args: StageArgs, config: &Config) -> LockstageResult<()> {
    let roots = resolve_roots(args.source_root.as_deref(), args.target_root.as_deref())?;
    debug!(
        "Source root {}, target root {}",
        roots.source_root.display(),
        roots.target_root.display()
    );

    let fs = LocalFs;
    let ids = UuidGenerator;
    let distributor = create_distributor(&config.cache, &roots.target_root, !args.no_restore);
    let outputs = PipelineOutputs::new(args.output_file.clone());

    let mut stager = DependencyStager::new(&fs, &ids, &*distributor)
        .with_isolated_prefix(&config.staging.isolated_prefix);
    if config.staging.publish_output {
        stager = stager.with_output(&outputs, &config.staging.output_name);
    }

    let manifest = args.manifest.as_deref().unwrap_or_default();
    let outcome = stager.cache_dependencies(manifest, &roots).await?;
    print_outcome(&outcome, args.format)?;

    match outcome {
        Outcome::Failed { reason } => Err(LockstageError::Staging(reason)),
        Outcome::Skipped | Outcome::Staged { .. } => Ok(()),
    }
}

fn print_outcome(outcome: &Outcome, format: OutputFormat) -> LockstageResult<()> {
    if matches!(outcome, Outcome::Skipped) {
        return Ok(());
    }
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcome)?),
        OutputFormat::Text => {
            if let Some(path) = outcome.dependency_path() {
                println!("{}", path);
            }
        }
    }
    Ok(())
}

/// Work out both roots from flags, CI variables and the current directory
pub fn resolve_roots(
    source_root: Option<&Path>,
    target_root: Option<&Path>,
) -> LockstageResult<ResolutionRoots> {
    let cwd = env::current_dir().map_err(|e| LockstageError::io("getting current directory", e))?;

    Ok(ResolutionRoots::new(
        root_or_fallback(source_root, SOURCE_ROOT_FALLBACK_VAR, &cwd),
        root_or_fallback(target_root, TARGET_ROOT_FALLBACK_VAR, &cwd),
    ))
}

fn root_or_fallback(explicit: Option<&Path>, fallback_var: &str, cwd: &Path) -> PathBuf {
    let root = explicit
        .map(Path::to_path_buf)
        .or_else(|| {
            env::var_os(fallback_var)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| cwd.to_path_buf());

    if root.is_absolute() {
        root
    } else {
        cwd.join(root)
    }
}
