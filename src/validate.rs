//! Structural validation of workflow definitions.
//!
//! Validation runs once, when a definition is offered to a store, and checks
//! referential integrity and cardinality only. It deliberately ignores
//! `enabled` flags, state reachability, and graph connectivity. In
//! particular, a definition whose single initial state is disabled passes
//! validation even though no instance of it can ever be created - the
//! enabled filter applies at instance creation, not here.

use std::collections::HashSet;

use thiserror::Error;

use crate::model::WorkflowDefinition;

/// Reasons a definition is structurally ill-formed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two states in the definition share an id.
    #[error("duplicate state id '{0}'")]
    DuplicateStateId(String),

    /// The definition has zero or more than one initial state.
    #[error("expected exactly one initial state, found {0}")]
    InvalidInitialStateCount(usize),

    /// An action's `toState` or one of its `fromStates` names an undeclared
    /// state.
    #[error("action '{0}' references an unknown state")]
    UnknownStateReference(String),
}

/// Check a definition for structural well-formedness.
///
/// Checks run in a fixed order and the first failure wins:
/// 1. all state ids unique
/// 2. exactly one state with `is_initial` (enabled or not)
/// 3. every action reference resolves to a declared state
///
/// Pure and deterministic; needs no store.
///
/// # Example
///
/// ```rust
/// use flowstate::model::{State, WorkflowDefinition};
/// use flowstate::validate::{validate, ValidationError};
///
/// let def = WorkflowDefinition {
///     id: "wf".to_string(),
///     states: vec![State {
///         id: "only".to_string(),
///         name: "Only".to_string(),
///         is_initial: false,
///         is_final: false,
///         enabled: true,
///     }],
///     actions: vec![],
/// };
///
/// assert_eq!(validate(&def), Err(ValidationError::InvalidInitialStateCount(0)));
/// ```
pub fn validate(def: &WorkflowDefinition) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for state in &def.states {
        if !seen.insert(state.id.as_str()) {
            return Err(ValidationError::DuplicateStateId(state.id.clone()));
        }
    }

    let initial_count = def.states.iter().filter(|s| s.is_initial).count();
    if initial_count != 1 {
        return Err(ValidationError::InvalidInitialStateCount(initial_count));
    }

    for action in &def.actions {
        let dangling = !seen.contains(action.to_state.as_str())
            || action.from_states.iter().any(|f| !seen.contains(f.as_str()));
        if dangling {
            return Err(ValidationError::UnknownStateReference(action.id.clone()));
        }
    }

    Ok(())
}
