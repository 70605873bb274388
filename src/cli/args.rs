//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Lockstage - stage dependency manifests for CI caching
///
/// Copies a lockfile bundled with your tooling into the working tree without
/// clobbering the project's own files, then restores the cache keyed on it.
#[derive(Parser, Debug)]
#[command(name = "lockstage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LOCKSTAGE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage a dependency manifest and restore its cache
    Stage(StageArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the stage command
#[derive(Parser, Debug)]
pub struct StageArgs {
    /// Manifest path relative to the source root (empty disables staging)
    pub manifest: Option<String>,

    /// Directory the manifest path is relative to
    /// [default: $GITHUB_ACTION_PATH, then current directory]
    #[arg(long, env = "LOCKSTAGE_SOURCE_ROOT")]
    pub source_root: Option<PathBuf>,

    /// Working tree the cache backend operates on
    /// [default: $GITHUB_WORKSPACE, then current directory]
    #[arg(long, env = "LOCKSTAGE_TARGET_ROOT")]
    pub target_root: Option<PathBuf>,

    /// Stage the manifest but skip the cache restore
    #[arg(long)]
    pub no_restore: bool,

    /// File receiving `name=value` step outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for the stage command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Resolved path only
    Text,
    /// Outcome as JSON
    Json,
}
