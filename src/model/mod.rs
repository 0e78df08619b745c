//! Workflow data model.
//!
//! This module contains the plain-data types the rest of the crate operates
//! on:
//! - `State` and `Action` describe the shape of a workflow
//! - `WorkflowDefinition` is the immutable schema of states and actions
//! - `WorkflowInstance` tracks one entity's progress through a definition
//! - `HistoryEntry` records a single fired action
//!
//! All types are serde-serializable with camelCase field names, so they
//! round-trip through the HTTP layer and the file-backed store unchanged.

mod action;
mod definition;
mod instance;
mod state;

pub use action::Action;
pub use definition::WorkflowDefinition;
pub use instance::{HistoryEntry, WorkflowInstance};
pub use state::State;
