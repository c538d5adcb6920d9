use super::{KeyValueStore, Partition, StoreError};
use dashmap::DashMap;

/// In-process store. Default backend when no storage directory is configured.
#[derive(Default)]
pub struct MemoryStore {
    map: DashMap<(Partition, String), String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, partition: Partition) -> usize {
        self.map.iter().filter(|r| r.key().0 == partition).count()
    }

    pub fn is_empty(&self, partition: Partition) -> bool {
        self.len(partition) == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, partition: Partition, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .map
            .get(&(partition, key.to_string()))
            .map(|r| r.value().clone()))
    }

    fn set(&self, partition: Partition, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.insert((partition, key.to_string()), value.to_string());
        Ok(())
    }

    fn delete(&self, partition: Partition, key: &str) -> Result<(), StoreError> {
        self.map.remove(&(partition, key.to_string()));
        Ok(())
    }

    fn clear(&self, partition: Partition) -> Result<(), StoreError> {
        self.map.retain(|(p, _), _| *p != partition);
        Ok(())
    }
}
