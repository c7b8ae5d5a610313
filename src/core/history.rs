//! Recent-conversion history: a bounded, deduplicated, most-recent-first
//! list persisted through a [`HistoryBacking`].

use crate::store::HistoryBacking;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key holding the serialized history list.
pub const HISTORY_KEY: &str = "conversionHistory";

/// Maximum number of retained conversions.
pub const HISTORY_MAX: usize = 5;

/// One completed conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// Creation time in epoch milliseconds.
    #[serde(rename = "ts")]
    pub timestamp: i64,
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub result: f64,
    pub rate: f64,
}

impl ConversionRecord {
    /// Repeats of the same conversion are refreshed in history rather than
    /// duplicated. Equality on `amount` and `result` is exact.
    fn same_conversion(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.amount == other.amount
            && self.result == other.result
    }
}

/// Owns the canonical persisted history list. Storage failures are logged
/// and absorbed; they never interrupt the conversion flow.
pub struct HistoryStore {
    backing: Arc<dyn HistoryBacking>,
}

impl HistoryStore {
    pub fn new(backing: Arc<dyn HistoryBacking>) -> Self {
        HistoryStore { backing }
    }

    /// Reads the persisted list, most-recent first. Absent or malformed
    /// data degrades to an empty list.
    pub fn load(&self) -> Vec<ConversionRecord> {
        let raw = match self.backing.get(HISTORY_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to load history: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("Discarding malformed history: {e}");
                Vec::new()
            }
        }
    }

    /// Inserts `record` at the front, dropping any prior entry for the same
    /// conversion and anything beyond the capacity.
    pub fn add(&self, record: ConversionRecord) {
        let mut records = self.load();
        records.retain(|r| !r.same_conversion(&record));
        records.insert(0, record);
        records.truncate(HISTORY_MAX);
        debug!("Persisting {} history entries", records.len());
        self.save(&records);
    }

    /// Removes the persisted history entirely.
    pub fn clear(&self) {
        if let Err(e) = self.backing.remove(HISTORY_KEY) {
            warn!("Failed to clear history: {e}");
        }
    }

    fn save(&self, records: &[ConversionRecord]) {
        let result = serde_json::to_vec(records)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| self.backing.set(HISTORY_KEY, &bytes));
        if let Err(e) = result {
            warn!("Failed to save history: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryBacking;
    use anyhow::{Result, anyhow};

    fn record(from: &str, to: &str, amount: f64, rate: f64) -> ConversionRecord {
        ConversionRecord {
            timestamp: 1_700_000_000_000,
            from: from.to_string(),
            to: to.to_string(),
            amount,
            result: amount * rate,
            rate,
        }
    }

    fn store() -> HistoryStore {
        HistoryStore::new(Arc::new(MemoryBacking::new()))
    }

    #[test]
    fn test_load_empty_when_no_data() {
        assert!(store().load().is_empty());
    }

    #[test]
    fn test_add_and_load_round_trip() {
        let store = store();
        store.add(record("USD", "EUR", 100.0, 0.92));
        store.add(record("EUR", "INR", 50.0, 90.5));

        let records = store.load();
        assert_eq!(records.len(), 2);
        // Most-recent first
        assert_eq!(records[0], record("EUR", "INR", 50.0, 90.5));
        assert_eq!(records[1], record("USD", "EUR", 100.0, 0.92));
    }

    #[test]
    fn test_duplicate_conversion_is_refreshed_not_duplicated() {
        let store = store();
        store.add(record("USD", "EUR", 100.0, 0.92));
        store.add(record("USD", "GBP", 100.0, 0.79));

        let mut repeat = record("USD", "EUR", 100.0, 0.92);
        repeat.timestamp += 60_000;
        store.add(repeat.clone());

        let records = store.load();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], repeat);
        assert_eq!(records[1].to, "GBP");
    }

    #[test]
    fn test_same_pair_different_amount_is_a_new_entry() {
        let store = store();
        store.add(record("USD", "EUR", 100.0, 0.92));
        store.add(record("USD", "EUR", 200.0, 0.92));
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let store = store();
        for amount in 1..=6 {
            store.add(record("USD", "EUR", amount as f64, 0.92));
        }

        let records = store.load();
        assert_eq!(records.len(), HISTORY_MAX);
        assert_eq!(records[0].amount, 6.0);
        // The first add (amount=1) is the one evicted
        assert!(records.iter().all(|r| r.amount != 1.0));
    }

    #[test]
    fn test_clear_then_load_is_empty() {
        let store = store();
        store.add(record("USD", "EUR", 100.0, 0.92));
        assert_eq!(store.load().len(), 1);

        store.clear();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_malformed_data_degrades_to_empty() {
        let backing = Arc::new(MemoryBacking::new());
        backing.set(HISTORY_KEY, b"not valid json").unwrap();

        let store = HistoryStore::new(backing);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_non_array_data_degrades_to_empty() {
        let backing = Arc::new(MemoryBacking::new());
        backing.set(HISTORY_KEY, br#"{"ts": 1}"#).unwrap();

        let store = HistoryStore::new(backing);
        assert!(store.load().is_empty());
    }

    struct FailingBacking;

    impl HistoryBacking for FailingBacking {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(anyhow!("read failed"))
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<()> {
            Err(anyhow!("write failed"))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(anyhow!("remove failed"))
        }
    }

    #[test]
    fn test_storage_failures_are_absorbed() {
        let store = HistoryStore::new(Arc::new(FailingBacking));
        assert!(store.load().is_empty());
        store.add(record("USD", "EUR", 100.0, 0.92));
        store.clear();
    }
}
