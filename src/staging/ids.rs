//! Identifier generation for isolated staging directories

use uuid::Uuid;

/// Source of unique identifiers embedded in isolated directory names
pub trait IdGenerator: Send + Sync {
    /// Produce a fresh identifier, safe to use as a path segment
    fn generate(&self) -> String;
}

/// Random UUID v4 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
