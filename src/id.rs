//! Produces unique task identifiers.

use uuid::Uuid;

use crate::error::IdGenerationError;
use crate::model::TaskId;

/// Capability for allocating task identifiers. A trait rather than a bare
/// function so tests can substitute a deterministic generator.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Result<TaskId, IdGenerationError>;
}

/// Universally-unique, lowercase, hyphenated identifiers via UUID v4.
/// Collision probability is negligible for the lifetime of a process.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> Result<TaskId, IdGenerationError> {
        Ok(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_lowercase_hyphenated_ids() {
        let gen = UuidGenerator;
        let id = gen.generate().unwrap();
        assert_eq!(id.len(), 36);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() || c == '-'));
        assert_eq!(id, id.to_lowercase());
    }

    #[test]
    fn generates_unique_ids() {
        let gen = UuidGenerator;
        let a = gen.generate().unwrap();
        let b = gen.generate().unwrap();
        assert_ne!(a, b);
    }
}
