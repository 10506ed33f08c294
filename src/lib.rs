pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::ServeArgs;
pub use config::ProxyConfig;

pub use adapters::{HttpObjectStore, LocalStore, MemoryStore};
pub use crate::core::{composer::compose, session::ProofSession, submission::Submitter};
pub use utils::error::{ProofError, Result};
