//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{ParentKind, VoteDirection};

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} with id {id} not found")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("You don't have permission to modify this {entity_type}")]
    Forbidden { entity_type: &'static str },

    #[error("{entity_type} already {}", .direction.verb())]
    AlreadyVoted {
        entity_type: &'static str,
        direction: VoteDirection,
    },

    /// The primary copy was written but the mirror copy was not.
    #[error("{entity_type} {id} was updated but its {mirror} copy was not: {reason}")]
    PartialPropagation {
        entity_type: &'static str,
        id: Uuid,
        mirror: ParentKind,
        reason: String,
    },

    #[error(transparent)]
    Repository(#[from] RepoError),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        DomainError::NotFound { entity_type, id }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Stored document is malformed: {0}")]
    Corrupt(String),
}
