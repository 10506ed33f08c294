use crate::core::filename;
use crate::core::session::{NoticeLevel, ProofSession};
use crate::domain::model::SVG_CONTENT_TYPE;
use crate::domain::ports::ObjectStore;
use crate::utils::error::Result;

/// Composes the session's preview and stores it under the order's key.
pub struct Submitter<S: ObjectStore> {
    store: S,
}

impl<S: ObjectStore> Submitter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// One attempt, no retry. Returns the key the preview was stored under.
    pub async fn submit(&self, session: &ProofSession) -> Result<String> {
        let key = filename::key_for(&session.order)?;
        let document = session.compose()?;

        tracing::info!(
            "Submitting preview '{}' ({} fonts, monogram: {})",
            key,
            session.selection.len(),
            session.monogram.is_some()
        );
        self.store
            .put(&key, document.into_bytes(), Some(SVG_CONTENT_TYPE))
            .await?;

        tracing::info!("Stored preview '{}'", key);
        Ok(key)
    }

    /// Like [`Submitter::submit`], but reports the outcome as a notice on the session.
    pub async fn submit_with_notice(&self, session: &mut ProofSession) -> Option<String> {
        match self.submit(session).await {
            Ok(key) => {
                session
                    .notices
                    .post(NoticeLevel::Info, format!("Submitted as {}", key));
                Some(key)
            }
            Err(e) => {
                tracing::warn!("Submission failed: {} ({:?})", e, e.category());
                session.report(&e);
                None
            }
        }
    }
}
