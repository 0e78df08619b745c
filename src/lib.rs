//! Flowstate: a finite-state workflow engine
//!
//! Flowstate keeps its core pure: the definition validator and the
//! transition engine are side-effect-free functions over plain data, while
//! storage, id generation, and HTTP serving live in an imperative shell
//! around them.
//!
//! # Core Concepts
//!
//! - **Definition**: the static schema of states and actions for a class of
//!   workflows, validated once at creation
//! - **Instance**: one live execution of a definition, tracking its current
//!   state and an append-only history of fired actions
//! - **Engine**: decides whether an action may legally fire and computes the
//!   resulting instance as a new value
//! - **Store**: keyed ownership of definitions and instances, in memory or
//!   flushed to JSON documents
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use flowstate::model::WorkflowDefinition;
//! use flowstate::service::WorkflowService;
//! use flowstate::store::MemoryStore;
//!
//! let def: WorkflowDefinition = serde_json::from_str(r#"{
//!     "id": "doc-approval",
//!     "states": [
//!         {"id": "draft", "name": "Draft", "isInitial": true},
//!         {"id": "review", "name": "Review"},
//!         {"id": "approved", "name": "Approved", "isFinal": true}
//!     ],
//!     "actions": [
//!         {"id": "submit", "name": "Submit", "fromStates": ["draft"], "toState": "review"},
//!         {"id": "approve", "name": "Approve", "fromStates": ["review"], "toState": "approved"}
//!     ]
//! }"#).unwrap();
//!
//! let service = WorkflowService::new(Arc::new(MemoryStore::new()));
//! service.create_definition(def).unwrap();
//!
//! let inst = service.create_instance("doc-approval").unwrap();
//! assert_eq!(inst.current_state, "draft");
//!
//! let inst = service.fire_action(&inst.id, "submit").unwrap();
//! assert_eq!(inst.current_state, "review");
//! assert_eq!(inst.history.len(), 1);
//! ```

pub mod engine;
pub mod model;
pub mod server;
pub mod service;
pub mod store;
pub mod validate;

// Re-export commonly used types
pub use engine::{fire, TransitionError};
pub use model::{Action, HistoryEntry, State, WorkflowDefinition, WorkflowInstance};
pub use service::{ServiceError, WorkflowService};
pub use store::{JsonFileStore, MemoryStore, StoreError, WorkflowStore};
pub use validate::{validate, ValidationError};
