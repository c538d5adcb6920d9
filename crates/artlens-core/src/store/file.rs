use super::{KeyValueStore, Partition, StoreError};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

type Document = BTreeMap<String, String>;

/// One JSON document per partition under `dir`.
///
/// Writes go to a temp file and are renamed into place, so a crash never
/// leaves a half-written partition behind.
pub struct FileStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!("Opened file store at {}", dir.display());
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    fn path(&self, partition: Partition) -> PathBuf {
        self.dir.join(format!("{}.json", partition.as_str()))
    }

    fn read(&self, partition: Partition) -> Result<Document, StoreError> {
        match fs::read(self.path(partition)) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|source| StoreError::Corrupt { partition, source }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, partition: Partition, doc: &Document) -> Result<(), StoreError> {
        let path = self.path(partition);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(doc)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, partition: Partition, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.read(partition)?.remove(key))
    }

    fn set(&self, partition: Partition, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut doc = self.read(partition)?;
        doc.insert(key.to_string(), value.to_string());
        self.write(partition, &doc)
    }

    fn delete(&self, partition: Partition, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut doc = self.read(partition)?;
        if doc.remove(key).is_some() {
            self.write(partition, &doc)?;
        }
        Ok(())
    }

    fn clear(&self, partition: Partition) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        match fs::remove_file(self.path(partition)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set(Partition::Auth, "token", "abc").unwrap();
            store.set(Partition::App, "onboarded", "true").unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get(Partition::Auth, "token").unwrap().as_deref(), Some("abc"));
        assert_eq!(
            store.get(Partition::App, "onboarded").unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_clear_only_touches_one_partition() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set(Partition::Auth, "token", "abc").unwrap();
        store.set(Partition::App, "theme", "dark").unwrap();

        store.clear(Partition::Auth).unwrap();
        store.clear(Partition::Auth).unwrap();

        assert_eq!(store.get(Partition::Auth, "token").unwrap(), None);
        assert_eq!(store.get(Partition::App, "theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_corrupt_partition_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.json"), b"{not json").unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let err = store.get(Partition::App, "theme").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { partition: Partition::App, .. }));
    }
}
