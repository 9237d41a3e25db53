use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{db::store::KeyValueStore, error::AppResult, models::CatalogItem};

/// The user's saved titles, newest first, persisted under a single key
///
/// Every toggle rewrites the whole list while still holding the lock, so two
/// toggles can never interleave their read-modify-write or their flush.
pub struct BookmarkStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    items: Mutex<Vec<CatalogItem>>,
}

impl BookmarkStore {
    /// Loads the persisted list. Absent, unreadable or malformed values start empty.
    pub async fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let items = match store.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CatalogItem>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "Discarding malformed bookmark list");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, key = %key, backend = store.name(), "Failed to read bookmarks");
                Vec::new()
            }
        };

        tracing::info!(count = items.len(), backend = store.name(), "Bookmarks loaded");

        Self {
            store,
            key,
            items: Mutex::new(items),
        }
    }

    /// Adds the item if its id is absent, removes it otherwise.
    ///
    /// Returns whether the item is bookmarked afterwards.
    pub async fn toggle(&self, item: CatalogItem) -> bool {
        let mut items = self.items.lock().await;

        let now_saved = match items.iter().position(|m| m.id == item.id) {
            Some(idx) => {
                items.remove(idx);
                false
            }
            None => {
                items.insert(0, item);
                true
            }
        };

        if let Err(e) = self.flush(&items).await {
            tracing::error!(error = %e, key = %self.key, "Failed to persist bookmarks");
        }

        now_saved
    }

    async fn flush(&self, items: &[CatalogItem]) -> AppResult<()> {
        let json = serde_json::to_string(items)?;
        self.store.set(&self.key, &json).await
    }

    pub async fn list(&self) -> Vec<CatalogItem> {
        self.items.lock().await.clone()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.items.lock().await.iter().any(|m| m.id == id)
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MemoryStore;
    use crate::error::AppError;

    const KEY: &str = "streamai-mylist";

    fn item(id: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            title: format!("Title {}", id),
            ..Default::default()
        }
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Err(AppError::Internal("offline".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str) -> AppResult<()> {
            Err(AppError::Internal("offline".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_toggle_prepends_newest_first() {
        let bookmarks = BookmarkStore::load(Arc::new(MemoryStore::new()), KEY).await;

        assert!(bookmarks.toggle(item("1")).await);
        assert!(bookmarks.toggle(item("2")).await);

        let ids: Vec<String> = bookmarks.list().await.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_toggle_parity_never_duplicates() {
        let bookmarks = BookmarkStore::load(Arc::new(MemoryStore::new()), KEY).await;

        for count in 1..=7 {
            bookmarks.toggle(item("9")).await;
            assert_eq!(bookmarks.contains("9").await, count % 2 == 1);
            assert!(bookmarks.len().await <= 1);
        }
    }

    #[tokio::test]
    async fn test_toggle_flushes_to_store() {
        let store = Arc::new(MemoryStore::new());
        let bookmarks = BookmarkStore::load(store.clone(), KEY).await;

        bookmarks.toggle(item("1")).await;

        let raw = store.get(KEY).await.unwrap().unwrap();
        let saved: Vec<CatalogItem> = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, "1");

        let reloaded = BookmarkStore::load(store, KEY).await;
        assert!(reloaded.contains("1").await);
    }

    #[tokio::test]
    async fn test_malformed_value_loads_empty() {
        let store = Arc::new(MemoryStore::with_value(KEY, "{not json"));
        let bookmarks = BookmarkStore::load(store, KEY).await;
        assert_eq!(bookmarks.len().await, 0);
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_in_memory_state() {
        let bookmarks = BookmarkStore::load(Arc::new(FailingStore), KEY).await;
        assert_eq!(bookmarks.len().await, 0);

        assert!(bookmarks.toggle(item("1")).await);
        assert!(bookmarks.contains("1").await);
    }

    #[tokio::test]
    async fn test_concurrent_toggles_alternate() {
        let bookmarks = Arc::new(BookmarkStore::load(Arc::new(MemoryStore::new()), KEY).await);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let bookmarks = bookmarks.clone();
                tokio::spawn(async move { bookmarks.toggle(item("5")).await })
            })
            .collect();

        let mut added = 0;
        for handle in handles {
            if handle.await.unwrap() {
                added += 1;
            }
        }

        assert_eq!(added, 5);
        assert!(!bookmarks.contains("5").await);
    }
}
