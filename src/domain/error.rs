//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

/// Domain errors represent violations of the tree shape.
/// Queries over a well-formed tree are total and never produce these.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("node not found in arena: {0:?}")]
    NodeNotFound(Index),

    #[error("root already exists: {0:?}")]
    RootAlreadyExists(Index),

    #[error("duplicate name in lineage records: {0}")]
    DuplicateName(String),

    #[error("unknown progenitor '{progenitor}' named by record '{name}'")]
    UnknownProgenitor { name: String, progenitor: String },

    #[error("no root record: every record names a progenitor")]
    NoRoot,

    #[error("multiple root records: {0:?}")]
    MultipleRoots(Vec<String>),

    #[error("cycle detected in lineage records at: {0}")]
    CycleDetected(String),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
