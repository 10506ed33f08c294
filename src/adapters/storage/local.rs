use crate::core::filename::check_key;
use crate::domain::model::{ObjectMeta, StoredObject};
use crate::domain::ports::ObjectStore;
use crate::utils::error::{ProofError, Result};
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

const META_DIR: &str = ".meta";

/// Objects as plain files under `base_path`, content types in `.meta/<key>.json`.
///
/// A put stages the object and its sidecar under `.meta` and only then claims
/// the key, so a failed put never leaves a half-published object behind.
#[derive(Debug, Clone)]
pub struct LocalStore {
    base_path: PathBuf,
}

impl LocalStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.base_path.join(META_DIR).join(format!("{}.json", key))
    }

    /// A missing or unreadable sidecar only loses the content type.
    async fn read_meta(&self, key: &str) -> Option<ObjectMeta> {
        let raw = match fs::read(self.meta_path(key)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Unreadable metadata for '{}': {}", key, e);
                return None;
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::warn!("Corrupt metadata for '{}': {}", key, e);
                None
            }
        }
    }
}

struct Staged {
    key: String,
    staging_dir: PathBuf,
    object_path: PathBuf,
    meta_path: PathBuf,
}

impl Staged {
    fn publish(&self, bytes: &[u8], meta_json: &[u8]) -> Result<()> {
        let mut object = NamedTempFile::new_in(&self.staging_dir)?;
        object.write_all(bytes)?;
        object.as_file().sync_all()?;

        let mut meta = NamedTempFile::new_in(&self.staging_dir)?;
        meta.write_all(meta_json)?;

        // no-clobber persist is the atomic existence check
        if let Err(e) = object.persist_noclobber(&self.object_path) {
            return Err(match e.error.kind() {
                ErrorKind::AlreadyExists => ProofError::Conflict {
                    key: self.key.clone(),
                },
                _ => e.error.into(),
            });
        }

        if let Err(e) = meta.persist(&self.meta_path) {
            tracing::error!(
                "Failed to publish metadata for '{}', releasing key: {}",
                self.key,
                e.error
            );
            if let Err(remove) = std::fs::remove_file(&self.object_path) {
                tracing::error!("Failed to remove '{}': {}", self.object_path.display(), remove);
            }
            return Err(e.error.into());
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn list(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(keys),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with('.') {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<StoredObject> {
        check_key(key)?;
        let bytes = match fs::read(self.object_path(key)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ProofError::NotFound {
                    key: key.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let content_type = self.read_meta(key).await.and_then(|m| m.content_type);
        Ok(StoredObject {
            key: key.to_string(),
            bytes,
            content_type,
        })
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Result<()> {
        check_key(key)?;
        let staging_dir = self.base_path.join(META_DIR);
        fs::create_dir_all(&staging_dir).await?;

        let meta = ObjectMeta {
            content_type: content_type.map(str::to_string),
            size: bytes.len() as u64,
            uploaded_at: chrono::Utc::now(),
        };
        let meta_json = serde_json::to_vec_pretty(&meta)?;
        let staged = Staged {
            key: key.to_string(),
            staging_dir,
            object_path: self.object_path(key),
            meta_path: self.meta_path(key),
        };

        let path = staged.object_path.clone();
        tokio::task::spawn_blocking(move || staged.publish(&bytes, &meta_json))
            .await
            .map_err(|e| ProofError::Storage {
                message: format!("write task for '{}' failed: {}", key, e),
            })??;

        tracing::debug!("Wrote {} bytes to {}", meta.size, path.display());
        Ok(())
    }
}
