use crate::kv::{KeyValueStore, StoreError, StoreResult};
use crate::memory::{MemoryKeyValueStore, MemoryState};
use std::fs;
use std::path::{Path, PathBuf};

const STATE_FILE_NAME: &str = "confab-store.json";

/// File-backed key-value store for desktop builds.
///
/// Wraps the memory store and writes the whole state file after every
/// mutation, via a temp file and rename so a crash mid-write leaves
/// the previous state intact.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    state_file: PathBuf,
    inner: MemoryKeyValueStore,
}

impl FileKeyValueStore {
    pub fn new<P: AsRef<Path>>(root: P) -> StoreResult<Self> {
        fs::create_dir_all(root.as_ref())
            .map_err(|err| StoreError::Backend(format!("create store root failed: {err}")))?;
        let state_file = root.as_ref().join(STATE_FILE_NAME);
        let state = if state_file.exists() {
            let raw = fs::read(&state_file)
                .map_err(|err| StoreError::Backend(format!("read state file failed: {err}")))?;
            serde_json::from_slice::<MemoryState>(&raw)
                .map_err(|err| StoreError::Serialization(err.to_string()))?
        } else {
            MemoryState::default()
        };

        Ok(Self {
            state_file,
            inner: MemoryKeyValueStore::from_state(state),
        })
    }

    fn persist(&self) -> StoreResult<()> {
        let snapshot = self.inner.snapshot()?;
        let raw = serde_json::to_vec_pretty(&snapshot)
            .map_err(|err| StoreError::Serialization(err.to_string()))?;
        let tmp = self.state_file.with_extension("json.tmp");
        fs::write(&tmp, raw)
            .map_err(|err| StoreError::Backend(format!("write state file failed: {err}")))?;
        fs::rename(&tmp, &self.state_file)
            .map_err(|err| StoreError::Backend(format!("rename state file failed: {err}")))?;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.set(key, value)?;
        self.persist()
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key)?;
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reopen_restores_previous_values() {
        let tmp = tempfile::tempdir().expect("tempdir should be created");
        let store = FileKeyValueStore::new(tmp.path()).expect("store should initialize");
        store.set("sessions", "[]").expect("set should succeed");
        drop(store);

        let reopened = FileKeyValueStore::new(tmp.path()).expect("store should reopen");
        assert_eq!(
            reopened.get("sessions").expect("get should succeed").as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn corrupt_state_file_surfaces_serialization_error() {
        let tmp = tempfile::tempdir().expect("tempdir should be created");
        fs::write(tmp.path().join(STATE_FILE_NAME), b"not json")
            .expect("corrupt file should be written");

        let result = FileKeyValueStore::new(tmp.path());
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
