//! Lockstage - dependency manifest staging for CI caches
//!
//! Copies a lockfile that ships with reusable tooling into the pipeline's
//! working tree, without clobbering an unrelated file of the same name, and
//! hands the resulting path to a cache backend.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod staging;

pub use error::{LockstageError, LockstageResult};
