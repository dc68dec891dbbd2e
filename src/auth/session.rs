//! Session token storage

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::storage::KeyValueStore;
use crate::error::Result;

/// Holds the bearer token for the current session
///
/// The token is cached in memory and written through to durable storage, so
/// a new store over the same backing storage picks up where the last left off.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    cached: RwLock<Option<String>>,
}

impl SessionStore {
    /// Create a session store keeping its token under `key`
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            cached: RwLock::new(None),
        }
    }

    /// Current token, reading durable storage when nothing is cached
    pub async fn get_token(&self) -> Option<String> {
        if let Some(token) = self.cached.read().await.clone() {
            return Some(token);
        }

        let mut cached = self.cached.write().await;
        if cached.is_none() {
            match self.storage.get(&self.key) {
                Ok(stored) => *cached = stored,
                Err(e) => tracing::warn!("Failed to read stored token: {}", e),
            }
        }
        cached.clone()
    }

    /// Replace the token; `None` removes it from durable storage
    pub async fn set_token(&self, token: Option<String>) -> Result<()> {
        let mut cached = self.cached.write().await;
        match token {
            Some(token) => {
                self.storage.set(&self.key, &token)?;
                *cached = Some(token);
            }
            None => {
                *cached = None;
                self.storage.remove(&self.key)?;
            }
        }
        Ok(())
    }

    /// Shorthand for `set_token(None)`
    pub async fn clear(&self) -> Result<()> {
        self.set_token(None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::MemoryStore;

    #[tokio::test]
    async fn test_set_and_get_token() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()), "token");
        assert_eq!(store.get_token().await, None);

        store.set_token(Some("abc".to_string())).await.unwrap();
        assert_eq!(store.get_token().await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_token_survives_new_store_instance() {
        let storage = MemoryStore::new();
        let first = SessionStore::new(Arc::new(storage.clone()), "token");
        first.set_token(Some("abc".to_string())).await.unwrap();

        let second = SessionStore::new(Arc::new(storage), "token");
        assert_eq!(second.get_token().await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_clear_is_durable() {
        let storage = MemoryStore::new();
        let first = SessionStore::new(Arc::new(storage.clone()), "token");
        first.set_token(Some("abc".to_string())).await.unwrap();
        first.set_token(None).await.unwrap();
        assert_eq!(first.get_token().await, None);

        let second = SessionStore::new(Arc::new(storage.clone()), "token");
        assert_eq!(second.get_token().await, None);
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_token_caches_storage_value() {
        let storage = MemoryStore::new();
        storage.set("token", "abc").unwrap();
        let store = SessionStore::new(Arc::new(storage.clone()), "token");

        assert_eq!(store.get_token().await.as_deref(), Some("abc"));
        // Later reads come from the cache
        storage.remove("token").unwrap();
        assert_eq!(store.get_token().await.as_deref(), Some("abc"));
    }
}
