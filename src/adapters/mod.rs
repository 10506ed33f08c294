// Adapters layer: concrete implementations of the ports for external systems.

pub mod http;
pub mod storage;

pub use http::HttpObjectStore;
pub use storage::{open_store, LocalStore, MemoryStore};
