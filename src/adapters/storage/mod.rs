pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

pub use local::LocalStore;
pub use memory::MemoryStore;
#[cfg(feature = "s3")]
pub use s3::S3Store;

use crate::config::{Backend, StorageConfig};
use crate::domain::ports::ObjectStore;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use std::sync::Arc;

/// Opens the backend selected in `config`.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match config.backend {
        Backend::Memory => {
            tracing::warn!("Using in-memory storage; submissions are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        Backend::Local => {
            let root = validate_required_field("storage.root", &config.root)?;
            tracing::info!("Using local storage at {}", root);
            Ok(Arc::new(LocalStore::new(root)))
        }
        #[cfg(feature = "s3")]
        Backend::S3 => {
            let bucket = validate_required_field("storage.bucket", &config.bucket)?;
            let store = S3Store::connect(
                bucket.clone(),
                config.prefix.clone().unwrap_or_default(),
                config.region.clone(),
                config.endpoint_url.clone(),
            )
            .await;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "s3"))]
        Backend::S3 => Err(crate::utils::error::ProofError::ConfigError {
            message: "this build does not include the `s3` feature".to_string(),
        }),
    }
}
