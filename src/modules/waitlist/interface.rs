use async_trait::async_trait;
use thiserror::Error;

use super::model::WaitlistSignup;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    /// The datastore rejected the insert on the email unique constraint.
    /// Callers treat this as idempotent success, not an error.
    Duplicate,
}

#[async_trait]
pub trait WaitlistStore: Send + Sync {
    async fn insert(&self, signup: &WaitlistSignup) -> Result<InsertOutcome, StoreError>;
}
