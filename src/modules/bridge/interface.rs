use async_trait::async_trait;
use thiserror::Error;

use super::model::TokenPair;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("backend rejected request: {0}")]
    Rejected(String),
}

#[derive(Debug)]
pub enum TakeOutcome {
    Tokens(TokenPair),
    NotFound,
    AlreadyUsed,
}

#[async_trait]
pub trait BridgeStore: Send + Sync {
    /// Store a token pair for one-time retrieval; returns the reference id.
    async fn create(&self, tokens: &TokenPair) -> Result<String, StoreError>;

    /// Fetch and consume the record. Consumption is marked best-effort:
    /// a concurrent second take may still win, exact-once is out of scope.
    async fn take(&self, rid: &str) -> Result<TakeOutcome, StoreError>;
}
