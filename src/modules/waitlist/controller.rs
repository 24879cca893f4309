use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::interface::InsertOutcome;
use super::model::WaitlistSignup;
use super::schema::{
    clean_str, is_valid_email, WaitlistRequest, WaitlistResponse, MAX_CITY_LEN, MAX_HONEYPOT_LEN,
    MAX_REFERRER_LEN, MAX_SOURCE_LEN, MAX_USER_AGENT_LEN, MAX_UTM_LEN,
};
use crate::services::mailer::dispatch_confirmation;
use crate::AppState;

pub async fn join(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<WaitlistRequest>, JsonRejection>,
) -> Response {
    let ip = client_ip(&headers);

    // A malformed body is treated as an empty submission and falls into
    // the email validation below, keeping the response shape uniform.
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let decision = state.limiter.check(&ip);
    if !decision.allowed {
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(WaitlistResponse::err("Too many requests. Please try again later.")),
        )
            .into_response();
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(decision.retry_after_secs));
        return response;
    }

    // Bots that fill the hidden field get a quiet success and no row.
    if clean_str(req.company.as_deref(), MAX_HONEYPOT_LEN).is_some() {
        return (StatusCode::OK, Json(WaitlistResponse::ok())).into_response();
    }

    let email = req
        .email
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if !is_valid_email(&email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(WaitlistResponse::err("Enter a valid email.")),
        )
            .into_response();
    }

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    let signup = WaitlistSignup {
        email: email.clone(),
        city: clean_str(req.city.as_deref(), MAX_CITY_LEN),
        is_shift_worker: req.is_shift_worker,
        source: clean_str(req.source.as_deref(), MAX_SOURCE_LEN),
        referrer: clean_str(req.referrer.as_deref(), MAX_REFERRER_LEN),
        utm_source: clean_str(req.utm_source.as_deref(), MAX_UTM_LEN),
        utm_medium: clean_str(req.utm_medium.as_deref(), MAX_UTM_LEN),
        utm_campaign: clean_str(req.utm_campaign.as_deref(), MAX_UTM_LEN),
        utm_term: clean_str(req.utm_term.as_deref(), MAX_UTM_LEN),
        utm_content: clean_str(req.utm_content.as_deref(), MAX_UTM_LEN),
        ip: (ip != "unknown").then(|| ip.clone()),
        user_agent: clean_str(user_agent, MAX_USER_AGENT_LEN),
    };

    match state.waitlist_store.insert(&signup).await {
        Ok(InsertOutcome::Created) => {
            dispatch_confirmation(state.mailer.clone(), email, false);
            (StatusCode::OK, Json(WaitlistResponse::ok())).into_response()
        }
        Ok(InsertOutcome::Duplicate) => {
            dispatch_confirmation(state.mailer.clone(), email, true);
            (StatusCode::OK, Json(WaitlistResponse::already())).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "waitlist insert failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WaitlistResponse::err("Could not save your signup. Please try again.")),
            )
                .into_response()
        }
    }
}

/// Client address as seen through the reverse proxy.
fn client_ip(headers: &HeaderMap) -> String {
    if let Some(ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let ip = ip.trim();
        if !ip.is_empty() {
            return ip.to_string();
        }
    }

    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    "unknown".to_string()
}
