//! The static schema of a class of workflows.

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::state::State;

/// A workflow definition: the declared states and the actions permitted
/// between them.
///
/// Definitions are immutable once accepted by a store. Structural
/// well-formedness (unique state ids, exactly one initial state, no dangling
/// action references) is checked by [`validate`](crate::validate::validate)
/// at creation time, not here.
///
/// # Example
///
/// ```rust
/// use flowstate::model::WorkflowDefinition;
///
/// let def: WorkflowDefinition = serde_json::from_str(r#"{
///     "id": "doc-approval",
///     "states": [
///         {"id": "draft", "name": "Draft", "isInitial": true},
///         {"id": "done", "name": "Done", "isFinal": true}
///     ],
///     "actions": [
///         {"id": "finish", "name": "Finish", "fromStates": ["draft"], "toState": "done"}
///     ]
/// }"#).unwrap();
///
/// assert_eq!(def.enabled_initial_state().unwrap().id, "draft");
/// assert!(def.action("finish").is_some());
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    /// Globally unique identifier.
    pub id: String,
    /// Declared states, in declaration order.
    #[serde(default)]
    pub states: Vec<State>,
    /// Declared actions, in declaration order.
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl WorkflowDefinition {
    /// Look up a state by id.
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Look up an action by id.
    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// The state a new instance starts in: initial and enabled.
    ///
    /// Returns `None` when the definition's sole initial state is disabled.
    /// Validation guarantees at most one candidate, so the first match is
    /// the only match.
    pub fn enabled_initial_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_initial && s.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: &str, is_initial: bool, enabled: bool) -> State {
        State {
            id: id.to_string(),
            name: id.to_uppercase(),
            is_initial,
            is_final: false,
            enabled,
        }
    }

    fn definition(states: Vec<State>) -> WorkflowDefinition {
        WorkflowDefinition {
            id: "wf".to_string(),
            states,
            actions: Vec::new(),
        }
    }

    #[test]
    fn state_lookup_by_id() {
        let def = definition(vec![state("a", true, true), state("b", false, true)]);

        assert_eq!(def.state("b").unwrap().id, "b");
        assert!(def.state("missing").is_none());
    }

    #[test]
    fn enabled_initial_state_skips_disabled() {
        let def = definition(vec![state("a", true, false), state("b", false, true)]);

        assert!(def.enabled_initial_state().is_none());
    }

    #[test]
    fn enabled_initial_state_finds_candidate() {
        let def = definition(vec![state("a", false, true), state("b", true, true)]);

        assert_eq!(def.enabled_initial_state().unwrap().id, "b");
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let def: WorkflowDefinition = serde_json::from_str(r#"{"id": "empty"}"#).unwrap();

        assert!(def.states.is_empty());
        assert!(def.actions.is_empty());
    }
}
