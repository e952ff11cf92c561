/// Base abstractions for the domain layer
use std::fmt::Debug;

/// Trait for value objects - immutable objects defined by their attributes
/// Value objects are equal if all their attributes are equal
pub trait ValueObject: Clone + PartialEq + Debug {}

/// Trait for entities - objects with identity
/// Entities are equal if their IDs are equal, regardless of other attributes
pub trait Entity: Debug {
    type Id: ValueObject;

    fn id(&self) -> &Self::Id;
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value provided
    InvalidValue(String),
    /// Invalid operation
    InvalidOperation(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
            DomainError::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestId(String);
    impl ValueObject for TestId {}

    #[derive(Debug)]
    struct TestEntity {
        id: TestId,
        #[allow(dead_code)]
        value: String,
    }

    impl Entity for TestEntity {
        type Id = TestId;

        fn id(&self) -> &Self::Id {
            &self.id
        }
    }

    #[test]
    fn test_entity_has_identity() {
        let entity1 = TestEntity {
            id: TestId("T-1".to_string()),
            value: "original".to_string(),
        };

        let entity2 = TestEntity {
            id: TestId("T-1".to_string()),
            value: "modified".to_string(),
        };

        assert_eq!(entity1.id(), entity2.id());
    }

    #[test]
    fn test_domain_error_display() {
        let error = DomainError::InvalidValue("test".to_string());
        assert_eq!(error.to_string(), "Invalid value: test");

        let error = DomainError::InvalidOperation("mismatched dimensions".to_string());
        assert_eq!(error.to_string(), "Invalid operation: mismatched dimensions");
    }
}
