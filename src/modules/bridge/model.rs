use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A one-time session payload issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Row in `recovery_bridge`. Once `used_at` is set the record must never
/// yield its tokens again.
#[derive(Debug, Clone, Deserialize)]
pub struct RecoveryBridgeRecord {
    pub id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
