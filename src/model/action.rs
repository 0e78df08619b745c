//! A labeled transition between workflow states.

use serde::{Deserialize, Serialize};

use super::state::default_enabled;

/// A named transition that may be fired from any state in `from_states`,
/// landing the instance in `to_state`.
///
/// Disabled actions are declared but may not fire. `enabled` defaults to
/// `true` when absent from input.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Identifier the fire endpoint addresses this action by.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Whether this action may currently fire.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// State ids this action may fire from.
    #[serde(default)]
    pub from_states: Vec<String>,
    /// State id the instance lands in after firing.
    pub to_state: String,
}

impl Action {
    /// Check whether this action may fire from the given state id.
    pub fn fires_from(&self, state_id: &str) -> bool {
        self.from_states.iter().any(|s| s == state_id)
    }
}
