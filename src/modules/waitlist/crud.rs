use async_trait::async_trait;
use std::sync::Arc;

use super::interface::{InsertOutcome, StoreError, WaitlistStore};
use super::model::WaitlistSignup;
use crate::services::supabase::{SupabaseClient, SupabaseError};

const TABLE: &str = "waitlist_signups";

pub struct SupabaseWaitlist {
    client: Arc<SupabaseClient>,
}

impl SupabaseWaitlist {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WaitlistStore for SupabaseWaitlist {
    async fn insert(&self, signup: &WaitlistSignup) -> Result<InsertOutcome, StoreError> {
        let row = serde_json::to_value(signup)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match self.client.insert(TABLE, &row).await {
            Ok(()) => Ok(InsertOutcome::Created),
            Err(SupabaseError::UniqueViolation) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }
}
