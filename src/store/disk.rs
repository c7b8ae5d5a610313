use crate::store::HistoryBacking;
use anyhow::Result;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

/// Disk-persisted backing over a fjall keyspace.
pub struct DiskBacking {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskBacking {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let keyspace = fjall::Config::new(path).open()?;
        let partition = keyspace.open_partition("history", PartitionCreateOptions::default())?;
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl HistoryBacking for DiskBacking {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.partition.get(key)?.map(|slice| slice.to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        debug!("Store PUT for key: {key}");
        self.partition.insert(key, value)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        debug!("Store REMOVE for key: {key}");
        self.partition.remove(key)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_get_set_remove() {
        let dir = tempdir().unwrap();
        let backing = DiskBacking::open(dir.path()).unwrap();

        assert!(backing.get("key1").unwrap().is_none());

        backing.set("key1", b"value1").unwrap();
        assert_eq!(backing.get("key1").unwrap(), Some(b"value1".to_vec()));

        backing.remove("key1").unwrap();
        assert!(backing.get("key1").unwrap().is_none());
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let backing = DiskBacking::open(dir.path()).unwrap();
            backing.set("key1", b"value1").unwrap();
        }

        let backing = DiskBacking::open(dir.path()).unwrap();
        assert_eq!(backing.get("key1").unwrap(), Some(b"value1".to_vec()));
    }
}
