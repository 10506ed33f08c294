use crate::domain::model::StoredObject;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Bucket-style key/value store. `put` must be an atomic create-if-absent:
/// of two writes to the same key, exactly one succeeds and the other gets `Conflict`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Keys in ascending order.
    async fn list(&self) -> Result<Vec<String>>;
    async fn get(&self, key: &str) -> Result<StoredObject>;
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn allowed_origin(&self) -> Option<&str>;
    fn max_upload_bytes(&self) -> usize;
}
