//! In-memory map from upload identifiers to stored originals.
//!
//! Entries live for the lifetime of the process. Nothing is evicted, so an
//! entry keeps pointing at its file after the retention sweep deletes it;
//! composing such an image fails with a processing error.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::UploadRecord;

#[derive(Debug, Clone, Default)]
pub struct ImageRegistry {
    entries: Arc<RwLock<HashMap<String, PathBuf>>>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an upload, replacing any earlier path for the same id
    pub async fn put(&self, record: UploadRecord) {
        self.entries.write().await.insert(record.id, record.path);
    }

    pub async fn get(&self, id: &str) -> Option<PathBuf> {
        self.entries.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, path: &str) -> UploadRecord {
        UploadRecord {
            id: id.to_string(),
            path: PathBuf::from(path),
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let registry = ImageRegistry::new();
        assert!(registry.is_empty().await);

        registry.put(record("a", "uploads/a.png")).await;
        assert_eq!(registry.get("a").await, Some(PathBuf::from("uploads/a.png")));
        assert_eq!(registry.get("b").await, None);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_entry() {
        let registry = ImageRegistry::new();
        registry.put(record("a", "uploads/first.png")).await;
        registry.put(record("a", "uploads/second.png")).await;

        assert_eq!(registry.get("a").await, Some(PathBuf::from("uploads/second.png")));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let registry = ImageRegistry::new();
        let handle = registry.clone();
        handle.put(record("a", "uploads/a.png")).await;
        assert!(registry.get("a").await.is_some());
    }
}
