//! Storage of workflow definitions and instances.
//!
//! A store owns the canonical copy of every definition and instance, keyed
//! by id. It enforces identity uniqueness and delegates to the validator
//! before accepting a definition; everything else (initial-state selection,
//! transition legality) happens in the layers above.
//!
//! Two implementations ship with the crate:
//! - [`MemoryStore`] - volatile, lock-guarded maps
//! - [`JsonFileStore`] - the same contract flushed to JSON documents on
//!   every successful mutation

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use thiserror::Error;

use crate::model::{WorkflowDefinition, WorkflowInstance};
use crate::validate::ValidationError;

/// Failures surfaced by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A definition or instance with this id is already stored.
    #[error("'{0}' already exists")]
    DuplicateId(String),

    /// An update addressed an instance that was never stored.
    #[error("instance '{0}' does not exist")]
    UnknownInstance(String),

    /// The definition failed structural validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The backing file could not be read or written.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file held malformed JSON, or a value failed to encode.
    #[error("storage encoding failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Keyed ownership of definitions and instances.
///
/// Implementations must make each operation atomic with respect to the
/// others: a read never observes a half-applied mutation. Serializing the
/// whole read-modify-write cycle of a fire is the caller's job (see
/// [`WorkflowService`](crate::service::WorkflowService)).
///
/// Accessors return owned clones so no lock is held while callers work.
pub trait WorkflowStore: Send + Sync {
    /// Store a definition after validating it.
    ///
    /// Fails with [`StoreError::DuplicateId`] before validation runs if the
    /// id is taken, and with [`StoreError::Invalid`] if validation rejects
    /// the definition. Nothing is stored on failure.
    fn add_definition(&self, def: WorkflowDefinition) -> Result<(), StoreError>;

    /// Fetch a definition by id.
    fn definition(&self, id: &str) -> Option<WorkflowDefinition>;

    /// All stored definitions, in no significant order.
    fn definitions(&self) -> Vec<WorkflowDefinition>;

    /// Store an instance as-is.
    ///
    /// Fails with [`StoreError::DuplicateId`] if the id is taken. The store
    /// does not second-guess the instance's contents.
    fn add_instance(&self, inst: WorkflowInstance) -> Result<(), StoreError>;

    /// Fetch an instance by id.
    fn instance(&self, id: &str) -> Option<WorkflowInstance>;

    /// All stored instances, in no significant order.
    fn instances(&self) -> Vec<WorkflowInstance>;

    /// Replace a stored instance with an updated value.
    ///
    /// Fails with [`StoreError::UnknownInstance`] if no instance with this
    /// id exists. Subsequent reads observe the replacement atomically.
    fn update_instance(&self, inst: WorkflowInstance) -> Result<(), StoreError>;
}
