use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::storage::KeyValueStore;

/// In-memory key-value store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let guard = self
            .slots
            .read()
            .map_err(|_| AppError::storage("memory store lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut guard = self
            .slots
            .write()
            .map_err(|_| AppError::storage("memory store lock poisoned"))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
