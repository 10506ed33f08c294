use crate::core::filename::check_key;
use crate::domain::model::StoredObject;
use crate::domain::ports::ObjectStore;
use crate::utils::error::{ProofError, Result};
use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;

/// Process-local store; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, StoredObject>>> {
        self.objects.lock().map_err(|_| ProofError::Storage {
            message: "memory store lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.lock()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<StoredObject> {
        check_key(key)?;
        self.lock()?
            .get(key)
            .cloned()
            .ok_or_else(|| ProofError::NotFound {
                key: key.to_string(),
            })
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Result<()> {
        check_key(key)?;
        match self.lock()?.entry(key.to_string()) {
            Entry::Occupied(_) => Err(ProofError::Conflict {
                key: key.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(StoredObject {
                    key: key.to_string(),
                    bytes,
                    content_type: content_type.map(str::to_string),
                });
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_put_conflicts() {
        let store = MemoryStore::new();
        store.put("a.svg", b"one".to_vec(), None).await.unwrap();

        let err = store.put("a.svg", b"two".to_vec(), None).await.unwrap_err();
        assert!(matches!(err, ProofError::Conflict { .. }));
        assert_eq!(store.get("a.svg").await.unwrap().bytes, b"one");
    }

    #[tokio::test]
    async fn test_missing_key() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get("nope").await,
            Err(ProofError::NotFound { .. })
        ));
        assert!(matches!(
            store.get("").await,
            Err(ProofError::BadRequest { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let store = MemoryStore::new();
        for key in ["b", "c", "a"] {
            store.put(key, vec![], None).await.unwrap();
        }
        assert_eq!(store.list().await.unwrap(), vec!["a", "b", "c"]);
    }
}
