//! CLI command implementations

pub mod config;
pub mod stage;

pub use config::execute as config;
pub use stage::execute as stage;
