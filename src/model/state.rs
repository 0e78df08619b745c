//! A single named state within a workflow definition.

use serde::{Deserialize, Serialize};

/// One state in a workflow definition.
///
/// States are immutable values identified by `id`, which must be unique
/// within their definition. The flags control how the state participates in
/// a workflow:
///
/// - `is_initial`: new instances start here. A valid definition has exactly
///   one initial state.
/// - `is_final`: terminal. No action may fire while an instance sits in a
///   final state.
/// - `enabled`: disabled states are skipped when selecting an instance's
///   starting state. Defaults to `true` when absent from input.
///
/// # Example
///
/// ```rust
/// use flowstate::model::State;
///
/// let draft: State = serde_json::from_str(
///     r#"{"id": "draft", "name": "Draft", "isInitial": true}"#,
/// ).unwrap();
///
/// assert!(draft.is_initial);
/// assert!(!draft.is_final);
/// assert!(draft.enabled); // defaulted
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Identifier, unique within the owning definition.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Whether new instances of the definition start in this state.
    #[serde(default)]
    pub is_initial: bool,
    /// Whether this state is terminal.
    #[serde(default)]
    pub is_final: bool,
    /// Disabled states cannot be an instance's starting state.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

pub(crate) fn default_enabled() -> bool {
    true
}
