//! Workflow instances and their transition history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of one fired action.
///
/// History entries are immutable values appended by the transition engine;
/// nothing in the crate removes or rewrites them.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The action that fired.
    pub action_id: String,
    /// When it fired.
    pub timestamp: DateTime<Utc>,
}

/// One live execution of a workflow definition.
///
/// `current_state` and `history` change as actions fire; everything else is
/// fixed at creation. The transition engine never mutates an instance in
/// place - it returns an updated copy, and the store replaces the stored
/// value wholesale.
///
/// # Example
///
/// ```rust
/// use flowstate::model::WorkflowInstance;
///
/// let inst = WorkflowInstance::new("i-1", "doc-approval", "draft");
///
/// assert_eq!(inst.current_state, "draft");
/// assert!(inst.history.is_empty());
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
    /// Globally unique identifier.
    pub id: String,
    /// The definition this instance executes.
    pub definition_id: String,
    /// Id of the state the instance currently sits in.
    pub current_state: String,
    /// Fired actions, oldest first.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl WorkflowInstance {
    /// Create a fresh instance in the given starting state with an empty
    /// history.
    pub fn new(
        id: impl Into<String>,
        definition_id: impl Into<String>,
        initial_state: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            definition_id: definition_id.into(),
            current_state: initial_state.into(),
            history: Vec::new(),
        }
    }
}
