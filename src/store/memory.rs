//! Volatile in-memory store.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::model::{WorkflowDefinition, WorkflowInstance};
use crate::store::{StoreError, WorkflowStore};
use crate::validate::validate;

/// In-memory [`WorkflowStore`] backed by lock-guarded maps.
///
/// Contents vanish with the process. The reference implementation for tests
/// and the `--in-memory` server mode.
#[derive(Default)]
pub struct MemoryStore {
    definitions: RwLock<HashMap<String, WorkflowDefinition>>,
    instances: RwLock<HashMap<String, WorkflowInstance>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkflowStore for MemoryStore {
    fn add_definition(&self, def: WorkflowDefinition) -> Result<(), StoreError> {
        let mut definitions = self.definitions.write().expect("store lock poisoned");
        if definitions.contains_key(&def.id) {
            return Err(StoreError::DuplicateId(def.id));
        }
        validate(&def)?;
        definitions.insert(def.id.clone(), def);
        Ok(())
    }

    fn definition(&self, id: &str) -> Option<WorkflowDefinition> {
        self.definitions
            .read()
            .expect("store lock poisoned")
            .get(id)
            .cloned()
    }

    fn definitions(&self) -> Vec<WorkflowDefinition> {
        self.definitions
            .read()
            .expect("store lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    fn add_instance(&self, inst: WorkflowInstance) -> Result<(), StoreError> {
        let mut instances = self.instances.write().expect("store lock poisoned");
        if instances.contains_key(&inst.id) {
            return Err(StoreError::DuplicateId(inst.id));
        }
        instances.insert(inst.id.clone(), inst);
        Ok(())
    }

    fn instance(&self, id: &str) -> Option<WorkflowInstance> {
        self.instances
            .read()
            .expect("store lock poisoned")
            .get(id)
            .cloned()
    }

    fn instances(&self) -> Vec<WorkflowInstance> {
        self.instances
            .read()
            .expect("store lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    fn update_instance(&self, inst: WorkflowInstance) -> Result<(), StoreError> {
        let mut instances = self.instances.write().expect("store lock poisoned");
        if !instances.contains_key(&inst.id) {
            return Err(StoreError::UnknownInstance(inst.id));
        }
        instances.insert(inst.id.clone(), inst);
        Ok(())
    }
}
