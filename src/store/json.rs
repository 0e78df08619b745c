//! File-backed store persisting to JSON documents.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::{WorkflowDefinition, WorkflowInstance};
use crate::store::{StoreError, WorkflowStore};
use crate::validate::validate;

const DEFINITIONS_FILE: &str = "workflows.json";
const INSTANCES_FILE: &str = "instances.json";

/// [`WorkflowStore`] backed by two JSON documents under a data directory:
/// `workflows.json` (definitions by id) and `instances.json` (instances by
/// id).
///
/// Both documents are loaded once at [`open`](JsonFileStore::open) and
/// flushed after every successful mutation, so the on-disk state always
/// reflects the last accepted write. Writes go to a temporary sibling file
/// first and are renamed into place, so a crash mid-flush never truncates
/// the live document.
#[derive(Debug)]
pub struct JsonFileStore {
    definitions_path: PathBuf,
    instances_path: PathBuf,
    inner: Mutex<Inner>,
}

// BTreeMap keeps the flushed documents stable under re-serialization.
#[derive(Debug)]
struct Inner {
    definitions: BTreeMap<String, WorkflowDefinition>,
    instances: BTreeMap<String, WorkflowInstance>,
}

impl JsonFileStore {
    /// Open (or initialize) a store under `data_dir`.
    ///
    /// Missing files start as empty collections; a present file must parse,
    /// or opening fails with [`StoreError::Serde`].
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;

        let definitions_path = data_dir.join(DEFINITIONS_FILE);
        let instances_path = data_dir.join(INSTANCES_FILE);

        Ok(Self {
            inner: Mutex::new(Inner {
                definitions: load_map(&definitions_path)?,
                instances: load_map(&instances_path)?,
            }),
            definitions_path,
            instances_path,
        })
    }
}

fn load_map<T: DeserializeOwned>(path: &Path) -> Result<BTreeMap<String, T>, StoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn flush_map<T: Serialize>(path: &Path, map: &BTreeMap<String, T>) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(map)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl WorkflowStore for JsonFileStore {
    fn add_definition(&self, def: WorkflowDefinition) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if inner.definitions.contains_key(&def.id) {
            return Err(StoreError::DuplicateId(def.id));
        }
        validate(&def)?;
        inner.definitions.insert(def.id.clone(), def);
        flush_map(&self.definitions_path, &inner.definitions)
    }

    fn definition(&self, id: &str) -> Option<WorkflowDefinition> {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .definitions
            .get(id)
            .cloned()
    }

    fn definitions(&self) -> Vec<WorkflowDefinition> {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .definitions
            .values()
            .cloned()
            .collect()
    }

    fn add_instance(&self, inst: WorkflowInstance) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if inner.instances.contains_key(&inst.id) {
            return Err(StoreError::DuplicateId(inst.id));
        }
        inner.instances.insert(inst.id.clone(), inst);
        flush_map(&self.instances_path, &inner.instances)
    }

    fn instance(&self, id: &str) -> Option<WorkflowInstance> {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .instances
            .get(id)
            .cloned()
    }

    fn instances(&self) -> Vec<WorkflowInstance> {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .instances
            .values()
            .cloned()
            .collect()
    }

    fn update_instance(&self, inst: WorkflowInstance) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if !inner.instances.contains_key(&inst.id) {
            return Err(StoreError::UnknownInstance(inst.id));
        }
        inner.instances.insert(inst.id.clone(), inst);
        flush_map(&self.instances_path, &inner.instances)
    }
}
