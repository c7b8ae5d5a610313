use crate::store::HistoryBacking;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// In-memory backing for tests and ephemeral use.
#[derive(Default)]
pub struct MemoryBacking {
    inner: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBacking {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryBacking for MemoryBacking {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        debug!("Store PUT for key: {key}");
        self.inner.lock().unwrap().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        debug!("Store REMOVE for key: {key}");
        self.inner.lock().unwrap().remove(key);
        Ok(())
    }
}
