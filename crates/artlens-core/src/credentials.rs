//! Credential persistence over the `auth` partition.

use crate::store::{KeyValueStore, Partition, StoreError};
use std::sync::Arc;
use tracing::{debug, info};

const TOKEN_KEY: &str = "token";
const REMEMBER_KEY: &str = "remember";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub token: String,
    pub remember: bool,
}

#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Token to attach as the auth header, if any.
    pub fn token(&self) -> Result<Option<String>, StoreError> {
        self.store.get(Partition::Auth, TOKEN_KEY)
    }

    pub fn load(&self) -> Result<Option<CredentialRecord>, StoreError> {
        let Some(token) = self.token()? else {
            return Ok(None);
        };
        let remember = self
            .store
            .get(Partition::Auth, REMEMBER_KEY)?
            .is_some_and(|v| v == "true");
        Ok(Some(CredentialRecord { token, remember }))
    }

    pub fn save(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        self.store.set(Partition::Auth, TOKEN_KEY, &record.token)?;
        self.store.set(
            Partition::Auth,
            REMEMBER_KEY,
            if record.remember { "true" } else { "false" },
        )?;
        debug!("Saved credentials (remember={})", record.remember);
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.clear(Partition::Auth)?;
        info!("Cleared local credentials");
        Ok(())
    }

    /// Start-up restore: a remembered session survives, anything else is dropped.
    pub fn restore(&self) -> Result<Option<CredentialRecord>, StoreError> {
        match self.load()? {
            Some(record) if record.remember => Ok(Some(record)),
            Some(_) => {
                self.clear()?;
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store() -> (Arc<MemoryStore>, CredentialStore) {
        let backing = Arc::new(MemoryStore::new());
        let creds = CredentialStore::new(backing.clone());
        (backing, creds)
    }

    #[test]
    fn test_save_then_load() {
        let (_, creds) = store();
        assert_eq!(creds.load().unwrap(), None);

        let record = CredentialRecord {
            token: "tok-1".into(),
            remember: true,
        };
        creds.save(&record).unwrap();

        assert_eq!(creds.token().unwrap().as_deref(), Some("tok-1"));
        assert_eq!(creds.load().unwrap(), Some(record));
    }

    #[test]
    fn test_restore_keeps_remembered_session() {
        let (_, creds) = store();
        creds
            .save(&CredentialRecord {
                token: "tok".into(),
                remember: true,
            })
            .unwrap();
        assert!(creds.restore().unwrap().is_some());
    }

    #[test]
    fn test_restore_discards_session_only_token() {
        let (backing, creds) = store();
        creds
            .save(&CredentialRecord {
                token: "tok".into(),
                remember: false,
            })
            .unwrap();

        assert_eq!(creds.restore().unwrap(), None);
        assert!(backing.is_empty(Partition::Auth));
    }

    #[test]
    fn test_clear_leaves_app_partition() {
        let (backing, creds) = store();
        backing.set(Partition::App, "onboarded", "true").unwrap();
        creds
            .save(&CredentialRecord {
                token: "tok".into(),
                remember: true,
            })
            .unwrap();

        creds.clear().unwrap();

        assert_eq!(creds.token().unwrap(), None);
        assert_eq!(backing.len(Partition::App), 1);
    }
}
