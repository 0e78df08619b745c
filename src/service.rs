//! Orchestration of workflow operations over an injected store.
//!
//! The service owns the flows the HTTP façade exposes: definition creation,
//! instance creation (initial-state selection and id generation), and the
//! fire flow. It is also where the single-writer discipline lives: each
//! instance's read-modify-write cycle runs under a mutex keyed by instance
//! id, so concurrent fires against the same instance cannot interleave and
//! lose updates.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::engine::{fire, TransitionError};
use crate::model::{WorkflowDefinition, WorkflowInstance};
use crate::store::{StoreError, WorkflowStore};

/// Failures surfaced by the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No definition with this id exists.
    #[error("definition '{0}' not found")]
    DefinitionNotFound(String),

    /// No instance with this id exists.
    #[error("instance '{0}' not found")]
    InstanceNotFound(String),

    /// The definition validates, but its sole initial state is disabled, so
    /// no instance can be created from it.
    #[error("definition '{0}' has no enabled initial state")]
    NoEnabledInitialState(String),

    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The transition engine rejected the fire.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Workflow operations over a store handle.
///
/// Constructed once at process start with the chosen store and shared
/// behind an `Arc`; no global state.
pub struct WorkflowService {
    store: Arc<dyn WorkflowStore>,
    fire_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl WorkflowService {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self {
            store,
            fire_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Validate and store a new definition, returning the stored value.
    pub fn create_definition(
        &self,
        def: WorkflowDefinition,
    ) -> Result<WorkflowDefinition, ServiceError> {
        self.store.add_definition(def.clone())?;
        tracing::info!(definition = %def.id, "workflow definition created");
        Ok(def)
    }

    pub fn definition(&self, id: &str) -> Result<WorkflowDefinition, ServiceError> {
        self.store
            .definition(id)
            .ok_or_else(|| ServiceError::DefinitionNotFound(id.to_string()))
    }

    pub fn definitions(&self) -> Vec<WorkflowDefinition> {
        self.store.definitions()
    }

    /// Spawn a new instance of a definition.
    ///
    /// The instance starts in the definition's enabled initial state with a
    /// generated v4 UUID id and an empty history.
    pub fn create_instance(&self, definition_id: &str) -> Result<WorkflowInstance, ServiceError> {
        let def = self.definition(definition_id)?;
        let initial = def
            .enabled_initial_state()
            .ok_or_else(|| ServiceError::NoEnabledInitialState(definition_id.to_string()))?;

        let inst = WorkflowInstance::new(Uuid::new_v4().to_string(), &def.id, &initial.id);
        self.store.add_instance(inst.clone())?;
        tracing::info!(
            instance = %inst.id,
            definition = %inst.definition_id,
            state = %inst.current_state,
            "workflow instance created"
        );
        Ok(inst)
    }

    pub fn instance(&self, id: &str) -> Result<WorkflowInstance, ServiceError> {
        self.store
            .instance(id)
            .ok_or_else(|| ServiceError::InstanceNotFound(id.to_string()))
    }

    pub fn instances(&self) -> Vec<WorkflowInstance> {
        self.store.instances()
    }

    /// Fire an action on an instance and persist the result.
    ///
    /// The whole fetch-fire-update cycle holds the instance's lock, so two
    /// concurrent fires against the same id serialize; fires against
    /// different ids proceed independently.
    pub fn fire_action(
        &self,
        instance_id: &str,
        action_id: &str,
    ) -> Result<WorkflowInstance, ServiceError> {
        let lock = self.instance_lock(instance_id);
        let _guard = lock.lock().expect("instance lock poisoned");

        let inst = self.instance(instance_id)?;
        let def = self.definition(&inst.definition_id)?;

        let updated = fire(&def, &inst, action_id, Utc::now())?;
        self.store.update_instance(updated.clone())?;
        tracing::info!(
            instance = %updated.id,
            action = %action_id,
            state = %updated.current_state,
            "action fired"
        );
        Ok(updated)
    }

    fn instance_lock(&self, instance_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.fire_locks.lock().expect("lock registry poisoned");
        locks
            .entry(instance_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
