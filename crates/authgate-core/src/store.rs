//! Durable credential storage.
//!
//! Persists one secret per user identifier in a dedicated sled tree.
//! `get` distinguishes "not found" (`Ok(None)`) from an actual store
//! fault (`Err`); `put` flushes before returning so durability is
//! observed by the caller. Later inserts for the same user overwrite
//! the earlier secret.

use std::time::Duration;

use tokio::time::timeout;

use crate::error::{Error, Result};

/// Tree name for credential records.
const CREDENTIAL_TREE: &str = "auth:credentials";

/// Default bound on a single store I/O operation.
const DEFAULT_OP_TIMEOUT_SECS: u64 = 5;

/// Credential store mapping user identifiers to secrets.
pub struct CredentialStore {
    tree: sled::Tree,
    op_timeout: Duration,
}

impl CredentialStore {
    /// Open the credential store on the given database.
    pub fn open(db: &sled::Db) -> Result<Self> {
        let tree = db.open_tree(CREDENTIAL_TREE)?;
        Ok(Self {
            tree,
            op_timeout: Duration::from_secs(DEFAULT_OP_TIMEOUT_SECS),
        })
    }

    /// Set the bound on a single store I/O operation.
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    /// Look up the secret for a user.
    ///
    /// Returns `Ok(None)` when the user has no credential record.
    pub async fn get(&self, user: &str) -> Result<Option<String>> {
        match self.tree.get(user.as_bytes())? {
            Some(bytes) => {
                let secret = std::str::from_utf8(&bytes)
                    .map_err(|_| Error::InvalidValue(user.to_string()))?;
                Ok(Some(secret.to_string()))
            }
            None => Ok(None),
        }
    }

    /// Store a secret for a user, overwriting any existing record.
    ///
    /// The write is flushed before this returns.
    pub async fn put(&self, user: &str, secret: &str) -> Result<()> {
        self.tree.insert(user.as_bytes(), secret.as_bytes())?;
        timeout(self.op_timeout, self.tree.flush_async())
            .await
            .map_err(|_| Error::Timeout)??;
        Ok(())
    }

    /// Number of credential records.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Check whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (CredentialStore, sled::Db) {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let store = CredentialStore::open(&db).unwrap();
        (store, db)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let (store, _db) = test_store();

        store.put("alice", "pw1").await.unwrap();
        assert_eq!(store.get("alice").await.unwrap(), Some("pw1".to_string()));
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let (store, _db) = test_store();

        assert_eq!(store.get("bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let (store, _db) = test_store();

        store.put("alice", "pw1").await.unwrap();
        store.put("alice", "pw2").await.unwrap();

        assert_eq!(store.get("alice").await.unwrap(), Some("pw2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_op_timeout_surfaces_as_timeout_error() {
        let (store, _db) = test_store();
        let store = store.with_op_timeout(Duration::ZERO);

        // The durable flush cannot complete within a zero bound.
        let err = store.put("alice", "pw1").await.unwrap_err();
        assert!(matches!(err, Error::Timeout));
    }

    #[tokio::test]
    async fn test_get_unaffected_by_op_timeout() {
        let (store, _db) = test_store();

        store.put("alice", "pw1").await.unwrap();

        let store = store.with_op_timeout(Duration::ZERO);
        assert_eq!(store.get("alice").await.unwrap(), Some("pw1".to_string()));
    }

    #[tokio::test]
    async fn test_exact_equality_no_normalization() {
        let (store, _db) = test_store();

        store.put("alice", " pw1 ").await.unwrap();
        assert_eq!(store.get("alice").await.unwrap(), Some(" pw1 ".to_string()));
    }
}
