use async_trait::async_trait;
use axum_test::TestServer;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use shifted_api::config::{BridgeStrategy, Config};
use shifted_api::modules::bridge::interface::{BridgeStore, StoreError as BridgeStoreError, TakeOutcome};
use shifted_api::modules::bridge::model::TokenPair;
use shifted_api::modules::waitlist::interface::{
    InsertOutcome, StoreError as WaitlistStoreError, WaitlistStore,
};
use shifted_api::modules::waitlist::model::WaitlistSignup;
use shifted_api::services::mailer::{Mailer, MailerError};
use shifted_api::services::rate_limit::FixedWindowLimiter;
use shifted_api::AppState;

// Allow dead_code for utilities used by other test files
#[allow(dead_code)]
pub struct TestContext {
    pub server: TestServer,
    pub waitlist: Arc<InMemoryWaitlist>,
    pub bridge: Arc<InMemoryBridge>,
    pub mailer: Arc<RecordingMailer>,
}

#[allow(dead_code)]
impl TestContext {
    pub async fn new() -> Self {
        // High limit so only the dedicated tests exercise rate limiting.
        Self::with_settings(100, BridgeStrategy::Reference).await
    }

    pub async fn with_settings(rate_limit: u32, bridge_strategy: BridgeStrategy) -> Self {
        Self::build(rate_limit, bridge_strategy, Some("test-anon-key")).await
    }

    pub async fn with_anon_key(anon_key: Option<&str>) -> Self {
        Self::build(100, BridgeStrategy::Reference, anon_key).await
    }

    async fn build(
        rate_limit: u32,
        bridge_strategy: BridgeStrategy,
        anon_key: Option<&str>,
    ) -> Self {
        let config = Config {
            supabase_url: "http://supabase.test".to_string(),
            supabase_service_role_key: "test-service-role-key".to_string(),
            supabase_anon_key: anon_key.map(str::to_string),
            smtp: None,
            site_url: "https://www.shifteddating.com".to_string(),
            app_scheme: "shifted".to_string(),
            bridge_strategy,
            waitlist_rate_limit: rate_limit,
            waitlist_rate_window_secs: 600,
            email_debug: false,
            port: 0,
        };

        let waitlist = Arc::new(InMemoryWaitlist::default());
        let bridge = Arc::new(InMemoryBridge::default());
        let mailer = Arc::new(RecordingMailer::default());

        let state = AppState {
            waitlist_store: waitlist.clone(),
            bridge_store: bridge.clone(),
            mailer: mailer.clone(),
            limiter: Arc::new(FixedWindowLimiter::new(
                rate_limit,
                std::time::Duration::from_secs(config.waitlist_rate_window_secs),
            )),
            config,
        };

        let app = shifted_api::create_app(state).await;
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            waitlist,
            bridge,
            mailer,
        }
    }

    /// The confirmation email is dispatched on a detached task; give the
    /// runtime a beat before asserting on the mailer.
    pub async fn settle(&self) {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}

#[derive(Default)]
pub struct InMemoryWaitlist {
    rows: Mutex<Vec<WaitlistSignup>>,
}

#[allow(dead_code)]
impl InMemoryWaitlist {
    pub fn rows(&self) -> Vec<WaitlistSignup> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl WaitlistStore for InMemoryWaitlist {
    async fn insert(&self, signup: &WaitlistSignup) -> Result<InsertOutcome, WaitlistStoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.email == signup.email) {
            return Ok(InsertOutcome::Duplicate);
        }
        rows.push(signup.clone());
        Ok(InsertOutcome::Created)
    }
}

#[derive(Default)]
pub struct InMemoryBridge {
    records: Mutex<HashMap<String, (TokenPair, bool)>>,
}

#[allow(dead_code)]
impl InMemoryBridge {
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl BridgeStore for InMemoryBridge {
    async fn create(&self, tokens: &TokenPair) -> Result<String, BridgeStoreError> {
        let rid = uuid::Uuid::new_v4().to_string();
        self.records
            .lock()
            .unwrap()
            .insert(rid.clone(), (tokens.clone(), false));
        Ok(rid)
    }

    async fn take(&self, rid: &str) -> Result<TakeOutcome, BridgeStoreError> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(rid) {
            None => Ok(TakeOutcome::NotFound),
            Some((_, used)) if *used => Ok(TakeOutcome::AlreadyUsed),
            Some((tokens, used)) => {
                *used = true;
                Ok(TakeOutcome::Tokens(tokens.clone()))
            }
        }
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, bool)>>,
}

#[allow(dead_code)]
impl RecordingMailer {
    pub fn sent(&self) -> Vec<(String, bool)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_waitlist_confirmation(&self, to: &str, already: bool) -> Result<(), MailerError> {
        self.sent.lock().unwrap().push((to.to_string(), already));
        Ok(())
    }
}
