use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Postgres unique-violation SQLSTATE, surfaced in PostgREST error bodies.
const UNIQUE_VIOLATION: &str = "23505";

/// Supabase REST client
/// Handles all communication with the managed datastore over PostgREST
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("unique constraint violation")]
    UniqueViolation,
}

impl SupabaseClient {
    pub fn new(base_url: String, service_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url,
            service_key,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    /// Insert a row without reading it back.
    pub async fn insert(&self, table: &str, row: &Value) -> Result<(), SupabaseError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|e| SupabaseError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(())
    }

    /// Insert a row and return the stored representation.
    pub async fn insert_returning(&self, table: &str, row: &Value) -> Result<Value, SupabaseError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| SupabaseError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        // PostgREST wraps representation responses in an array.
        let mut rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))?;

        if rows.is_empty() {
            return Err(SupabaseError::Parse("empty representation response".to_string()));
        }

        Ok(rows.remove(0))
    }

    /// Fetch at most one row matching the given column filters
    /// (values in PostgREST operator form, e.g. `eq.<id>`).
    pub async fn select_one(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Option<Value>, SupabaseError> {
        let response = self
            .client
            .get(self.table_url(table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(filters)
            .query(&[("limit", "1")])
            .send()
            .await
            .map_err(|e| SupabaseError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        let mut rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))?;

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    /// Patch rows matching the given filters.
    pub async fn update(
        &self,
        table: &str,
        filters: &[(&str, String)],
        patch: &Value,
    ) -> Result<(), SupabaseError> {
        let response = self
            .client
            .patch(self.table_url(table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=minimal")
            .query(filters)
            .json(patch)
            .send()
            .await
            .map_err(|e| SupabaseError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(())
    }

    async fn decode_error(response: reqwest::Response) -> SupabaseError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        // PostgREST error bodies look like {"code":"23505","message":...}
        if let Ok(parsed) = serde_json::from_str::<Value>(&body) {
            if parsed.get("code").and_then(Value::as_str) == Some(UNIQUE_VIOLATION) {
                return SupabaseError::UniqueViolation;
            }
        }

        SupabaseError::Api { status, body }
    }
}
