pub mod composer;
pub mod filename;
pub mod session;
pub mod submission;

pub use crate::domain::model::{StoredObject, SvgDocument};
pub use crate::domain::ports::{ConfigProvider, ObjectStore};
pub use crate::utils::error::Result;
