use super::{Backend, BackendError};
use crate::core::models::basis_file::{BasisFile, BasisFileId};
use crate::core::models::family::{Family, FamilyKind};
use crate::core::models::hash::ContentHash;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct MemoryState {
    last_id: u64,
    files: BTreeMap<BasisFileId, BasisFile>,
    hash_index: HashMap<ContentHash, Vec<BasisFileId>>,
    families: BTreeMap<(FamilyKind, String), Family>,
}

/// A process-local backend keeping every record in memory behind a single lock.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored basis files, duplicates included.
    pub fn basis_file_count(&self) -> Result<usize, BackendError> {
        Ok(self.read()?.files.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, BackendError> {
        self.state
            .read()
            .map_err(|_| BackendError::Unavailable("memory backend lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, BackendError> {
        self.state
            .write()
            .map_err(|_| BackendError::Unavailable("memory backend lock poisoned".to_string()))
    }
}

impl Backend for MemoryBackend {
    fn insert_basis_file(&self, file: &BasisFile) -> Result<BasisFileId, BackendError> {
        if let Some(id) = file.id() {
            return Err(BackendError::AlreadyExists(format!("basis file {}", id)));
        }

        let mut state = self.write()?;
        state.last_id += 1;
        let id = BasisFileId(state.last_id);

        state
            .hash_index
            .entry(file.content_hash().clone())
            .or_default()
            .push(id);
        state.files.insert(id, file.clone().with_id(id));
        Ok(id)
    }

    fn basis_file(&self, id: BasisFileId) -> Result<Option<BasisFile>, BackendError> {
        Ok(self.read()?.files.get(&id).cloned())
    }

    fn basis_files_with_hash(&self, hash: &ContentHash) -> Result<Vec<BasisFile>, BackendError> {
        let state = self.read()?;
        let files = state
            .hash_index
            .get(hash)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.files.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(files)
    }

    fn insert_family(&self, family: &Family) -> Result<(), BackendError> {
        let mut state = self.write()?;
        let key = (family.kind().clone(), family.name().to_string());
        if state.families.contains_key(&key) {
            return Err(BackendError::AlreadyExists(format!(
                "family '{}' of kind '{}'",
                family.name(),
                family.kind()
            )));
        }
        state.families.insert(key, family.clone());
        Ok(())
    }

    fn update_family(&self, family: &Family) -> Result<(), BackendError> {
        let mut state = self.write()?;
        let key = (family.kind().clone(), family.name().to_string());
        match state.families.get_mut(&key) {
            Some(stored) => {
                *stored = family.clone();
                Ok(())
            }
            None => Err(BackendError::Missing(format!(
                "family '{}' of kind '{}'",
                family.name(),
                family.kind()
            ))),
        }
    }

    fn family(&self, name: &str, kind: &FamilyKind) -> Result<Option<Family>, BackendError> {
        let state = self.read()?;
        Ok(state
            .families
            .get(&(kind.clone(), name.to_string()))
            .cloned())
    }

    fn families(&self, kind: &FamilyKind) -> Result<Vec<Family>, BackendError> {
        let state = self.read()?;
        Ok(state
            .families
            .values()
            .filter(|family| family.kind() == kind)
            .cloned()
            .collect())
    }
}
