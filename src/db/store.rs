use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{AppError, AppResult};

/// Durable string key-value storage
///
/// Values are opaque strings; callers own the serialization format.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Process-local store, used when no Redis URL is configured and in tests
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| AppError::Internal(format!("Memory store poisoned: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| AppError::Internal(format!("Memory store poisoned: {}", e)))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(assert_ok!(store.get("k").await), None);

        assert_ok!(store.set("k", "v1").await);
        assert_ok!(store.set("k", "v2").await);
        assert_eq!(assert_ok!(store.get("k").await).as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_memory_store_seeded() {
        let store = MemoryStore::with_value("list", "[]");
        assert_eq!(store.get("list").await.unwrap().as_deref(), Some("[]"));
    }
}
