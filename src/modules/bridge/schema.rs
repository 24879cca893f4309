use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct StoreTokensRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub access_token: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct StoreTokensResponse {
    pub rid: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct RetrieveQuery {
    #[serde(default)]
    pub rid: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BridgeErrorResponse {
    pub error: String,
}

impl BridgeErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
