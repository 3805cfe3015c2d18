//! Session store port
//!
//! Persists [`SessionSnapshot`]s so a forum can be listed, resumed and
//! deleted. The storage medium is up to the adapter.

use async_trait::async_trait;
use forum_domain::{SessionId, SessionSnapshot, SessionSummary};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Save (or overwrite) a snapshot
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StoreError>;

    async fn load(&self, id: &SessionId) -> Result<SessionSnapshot, StoreError>;

    /// Summaries of every stored session, most recently updated first
    async fn list(&self) -> Result<Vec<SessionSummary>, StoreError>;

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError>;
}

/// Store that keeps nothing
pub struct NoSessionStore;

#[async_trait]
impl SessionStore for NoSessionStore {
    async fn save(&self, _snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        Ok(())
    }

    async fn load(&self, id: &SessionId) -> Result<SessionSnapshot, StoreError> {
        Err(StoreError::NotFound(*id))
    }

    async fn list(&self) -> Result<Vec<SessionSummary>, StoreError> {
        Ok(Vec::new())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        Err(StoreError::NotFound(*id))
    }
}
