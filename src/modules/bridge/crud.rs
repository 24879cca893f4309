use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use super::interface::{BridgeStore, StoreError, TakeOutcome};
use super::model::{RecoveryBridgeRecord, TokenPair};
use crate::services::supabase::SupabaseClient;

const TABLE: &str = "recovery_bridge";

pub struct SupabaseBridge {
    client: Arc<SupabaseClient>,
}

impl SupabaseBridge {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BridgeStore for SupabaseBridge {
    async fn create(&self, tokens: &TokenPair) -> Result<String, StoreError> {
        let row = json!({
            "access_token": tokens.access_token,
            "refresh_token": tokens.refresh_token,
        });

        let stored = self
            .client
            .insert_returning(TABLE, &row)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        stored
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::Rejected("insert returned no id".to_string()))
    }

    async fn take(&self, rid: &str) -> Result<TakeOutcome, StoreError> {
        let filters = [("id", format!("eq.{}", rid))];

        let row = self
            .client
            .select_one(TABLE, &filters)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let Some(row) = row else {
            return Ok(TakeOutcome::NotFound);
        };

        let record: RecoveryBridgeRecord = serde_json::from_value(row)
            .map_err(|e| StoreError::Rejected(e.to_string()))?;

        if record.used_at.is_some() {
            return Ok(TakeOutcome::AlreadyUsed);
        }

        // Mark consumption before returning, but never fail the take on it.
        let patch = json!({ "used_at": Utc::now().to_rfc3339() });
        if let Err(e) = self.client.update(TABLE, &filters, &patch).await {
            tracing::warn!(rid = %rid, error = %e, "failed to mark bridge record as used");
        }

        Ok(TakeOutcome::Tokens(TokenPair {
            access_token: record.access_token,
            refresh_token: record.refresh_token,
        }))
    }
}
