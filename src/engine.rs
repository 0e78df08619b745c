//! The transition engine: deciding whether an action may fire.
//!
//! The engine is the pure core of the crate. It borrows a definition and an
//! instance, evaluates one requested action against the transition rules,
//! and either returns a fully updated copy of the instance or a rejection.
//! The caller's instance is never touched, so a failed fire is safe to
//! retry and the single-writer discipline lives entirely in the calling
//! layer.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{HistoryEntry, WorkflowDefinition, WorkflowInstance};

/// Reasons a requested action may not fire.
///
/// Each rule in [`fire`] short-circuits with its own variant so callers can
/// render precise diagnostics (and the HTTP layer can split not-found from
/// bad-request).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// No action with this id exists in the definition.
    #[error("action '{0}' not found")]
    ActionNotFound(String),

    /// The action exists but its `enabled` flag is false.
    #[error("action '{0}' is disabled")]
    ActionDisabled(String),

    /// The instance's current state is not in the action's `fromStates`.
    #[error("cannot fire action '{action_id}' from state '{current_state}'")]
    IllegalFromState {
        action_id: String,
        current_state: String,
    },

    /// The instance sits in a final state; nothing may fire from it.
    #[error("instance is already in final state '{0}'")]
    AlreadyFinal(String),
}

/// Evaluate one action against an instance and return the updated instance.
///
/// Rules run in order, first failure wins:
/// 1. the action id must exist in the definition ([`ActionNotFound`])
/// 2. the action must be enabled ([`ActionDisabled`])
/// 3. the instance's current state must be in `fromStates`
///    ([`IllegalFromState`])
/// 4. the current state must not be final ([`AlreadyFinal`]) - a final
///    state never sources a transition, even if an action nominally lists
///    it
///
/// On success the returned instance has one [`HistoryEntry`] appended
/// (stamped with `now`) and `current_state` set to the action's `toState`.
///
/// `now` is a parameter rather than a clock read so the engine stays
/// deterministic under test.
///
/// [`ActionNotFound`]: TransitionError::ActionNotFound
/// [`ActionDisabled`]: TransitionError::ActionDisabled
/// [`IllegalFromState`]: TransitionError::IllegalFromState
/// [`AlreadyFinal`]: TransitionError::AlreadyFinal
pub fn fire(
    def: &WorkflowDefinition,
    inst: &WorkflowInstance,
    action_id: &str,
    now: DateTime<Utc>,
) -> Result<WorkflowInstance, TransitionError> {
    let action = def
        .action(action_id)
        .ok_or_else(|| TransitionError::ActionNotFound(action_id.to_string()))?;

    if !action.enabled {
        return Err(TransitionError::ActionDisabled(action_id.to_string()));
    }

    if !action.fires_from(&inst.current_state) {
        return Err(TransitionError::IllegalFromState {
            action_id: action_id.to_string(),
            current_state: inst.current_state.clone(),
        });
    }

    // For a validated definition the membership check above guarantees the
    // current state is declared, so the lookup cannot miss here.
    if def.state(&inst.current_state).is_some_and(|s| s.is_final) {
        return Err(TransitionError::AlreadyFinal(inst.current_state.clone()));
    }

    let mut updated = inst.clone();
    updated.history.push(HistoryEntry {
        action_id: action_id.to_string(),
        timestamp: now,
    });
    updated.current_state = action.to_state.clone();
    Ok(updated)
}
