use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_CITY_LEN: usize = 80;
pub const MAX_SOURCE_LEN: usize = 200;
pub const MAX_REFERRER_LEN: usize = 500;
pub const MAX_UTM_LEN: usize = 200;
pub const MAX_USER_AGENT_LEN: usize = 512;
pub const MAX_HONEYPOT_LEN: usize = 200;

lazy_static! {
    // Deliberately loose; the mail relay is the real arbiter of deliverability.
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

#[derive(Debug, Deserialize, Default)]
pub struct WaitlistRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub is_shift_worker: Option<bool>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub utm_source: Option<String>,
    #[serde(default)]
    pub utm_medium: Option<String>,
    #[serde(default)]
    pub utm_campaign: Option<String>,
    #[serde(default)]
    pub utm_term: Option<String>,
    #[serde(default)]
    pub utm_content: Option<String>,
    /// Honeypot. Hidden in the form; humans never fill this.
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WaitlistResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WaitlistResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            already: None,
            error: None,
        }
    }

    pub fn already() -> Self {
        Self {
            ok: true,
            already: Some(true),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            already: None,
            error: Some(message.into()),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && EMAIL_RE.is_match(email)
}

/// Trim and truncate a free-text field; empty strings collapse to None.
pub fn clean_str(value: Option<&str>, max_len: usize) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(max_len).collect())
}
