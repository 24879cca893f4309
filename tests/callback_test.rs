use axum::http::{header, StatusCode};
use serde_json::json;
use shifted_api::config::BridgeStrategy;

mod common;

use common::TestContext;

fn location(response: &axum_test::TestResponse) -> String {
    response
        .header(header::LOCATION)
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn auth_code_is_forwarded_on_the_universal_link() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/auth/callback")
        .add_query_param("code", "pkce-code-1")
        .await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response),
        "https://www.shifteddating.com/open?next=profile-setup&code=pkce-code-1"
    );
}

#[tokio::test]
async fn reference_strategy_exchanges_tokens_for_a_rid() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/auth/callback")
        .add_query_param("access_token", "at-secret")
        .add_query_param("refresh_token", "rt-secret")
        .await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    let location = location(&response);
    assert!(location.starts_with("https://www.shifteddating.com/open?next=profile-setup&rid="));
    assert!(!location.contains("at-secret"));
    assert_eq!(ctx.bridge.record_count(), 1);

    // The rid on the link resolves to the original pair, once.
    let rid = location.split("rid=").nth(1).unwrap().to_string();
    let resolved = ctx
        .server
        .get("/recovery-bridge")
        .add_query_param("rid", &rid)
        .await;
    resolved.assert_status(StatusCode::OK);
    let tokens: serde_json::Value = resolved.json();
    assert_eq!(tokens["access_token"], "at-secret");
}

#[tokio::test]
async fn direct_strategy_embeds_tokens_in_the_link() {
    let ctx = TestContext::with_settings(100, BridgeStrategy::Direct).await;

    let response = ctx
        .server
        .get("/auth/callback")
        .add_query_param("access_token", "at-secret")
        .add_query_param("refresh_token", "rt-secret")
        .await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    let location = location(&response);
    assert!(location.contains("access_token=at-secret"));
    assert!(location.contains("refresh_token=rt-secret"));
    assert_eq!(ctx.bridge.record_count(), 0);
}

#[tokio::test]
async fn provider_error_is_surfaced_without_redirect() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/auth/callback")
        .add_query_param("error", "access_denied")
        .add_query_param("error_description", "Email link is invalid or has expired")
        .await;

    response.assert_status(StatusCode::OK);
    assert!(response.maybe_header(header::LOCATION).is_none());
    let page = response.text();
    assert!(page.contains("Email link is invalid or has expired"));
}

#[tokio::test]
async fn manual_visit_renders_the_open_affordance_without_redirect() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/auth/callback").await;

    response.assert_status(StatusCode::OK);
    assert!(response.maybe_header(header::LOCATION).is_none());
    let page = response.text();
    assert!(page.contains("Open Shifted"));
    assert!(page.contains("https://www.shifteddating.com/open?next=profile-setup"));
    assert!(page.contains("shifted://auth/callback?next=profile-setup"));
    assert_eq!(ctx.bridge.record_count(), 0);
}

#[tokio::test]
async fn open_fallback_passes_the_payload_to_the_custom_scheme() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/open")
        .add_query_param("next", "profile-setup")
        .add_query_param("rid", "abc-123")
        .await;

    response.assert_status(StatusCode::OK);
    let page = response.text();
    assert!(page.contains("shifted://auth/callback?next=profile-setup&amp;rid=abc-123"));
}

#[tokio::test]
async fn callback_responses_never_leak_referrer() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/auth/callback")
        .add_query_param("code", "pkce-code-1")
        .await;

    assert_eq!(
        response
            .maybe_header(header::REFERRER_POLICY)
            .as_ref()
            .and_then(|v| v.to_str().ok()),
        Some("no-referrer")
    );
}

#[tokio::test]
async fn health_reports_ok() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/health").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }));
}
