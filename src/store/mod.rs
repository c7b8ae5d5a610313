pub mod disk;
pub mod memory;

use anyhow::Result;

/// Byte-level key-value persistence behind the history store.
pub trait HistoryBacking: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
