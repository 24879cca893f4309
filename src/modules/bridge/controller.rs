use axum::{
    extract::{Query, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use super::interface::TakeOutcome;
use super::model::TokenPair;
use super::relay::{self, CallbackParams, Handoff, LinkBuilder, RelayOutcome};
use super::schema::{BridgeErrorResponse, RetrieveQuery, StoreTokensRequest, StoreTokensResponse};
use super::views;
use crate::config::BridgeStrategy;
use crate::AppState;

pub async fn store_tokens(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StoreTokensRequest>,
) -> Result<Json<StoreTokensResponse>, (StatusCode, Json<BridgeErrorResponse>)> {
    if req.validate().is_err() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(BridgeErrorResponse::new("missing_tokens")),
        ));
    }

    let tokens = TokenPair {
        access_token: req.access_token,
        refresh_token: req.refresh_token,
    };

    let rid = state.bridge_store.create(&tokens).await.map_err(|e| {
        tracing::error!(error = %e, "recovery bridge insert failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(BridgeErrorResponse::new(e.to_string())),
        )
    })?;

    Ok(Json(StoreTokensResponse { rid }))
}

pub async fn retrieve_tokens(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RetrieveQuery>,
) -> Result<Json<TokenPair>, (StatusCode, Json<BridgeErrorResponse>)> {
    let rid = match query.rid.as_deref().map(str::trim) {
        Some(rid) if !rid.is_empty() => rid.to_string(),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(BridgeErrorResponse::new("missing_rid")),
            ))
        }
    };

    match state.bridge_store.take(&rid).await {
        Ok(TakeOutcome::Tokens(tokens)) => Ok(Json(tokens)),
        Ok(TakeOutcome::NotFound) => Err((
            StatusCode::NOT_FOUND,
            Json(BridgeErrorResponse::new("not_found")),
        )),
        Ok(TakeOutcome::AlreadyUsed) => Err((
            StatusCode::GONE,
            Json(BridgeErrorResponse::new("already_used")),
        )),
        Err(e) => {
            tracing::error!(rid = %rid, error = %e, "recovery bridge lookup failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BridgeErrorResponse::new(e.to_string())),
            ))
        }
    }
}

/// Landing page for the auth provider's email-link redirect. Token
/// payloads arriving in the URL fragment are promoted into the query by
/// the manual page's inline script, so this handler sees every case.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    let params = CallbackParams::from_parts(query.as_deref(), None);
    let links = LinkBuilder::new(&state.config.site_url, &state.config.app_scheme);

    match relay::decide(&params) {
        RelayOutcome::ProviderError { description } => {
            tracing::info!(description = %description, "auth callback carried a provider error");
            Html(views::error_page(&description)).into_response()
        }
        RelayOutcome::SessionTokens(tokens) => {
            let handoff = match state.config.bridge_strategy {
                BridgeStrategy::Direct => Handoff::Direct(tokens),
                BridgeStrategy::Reference => match state.bridge_store.create(&tokens).await {
                    Ok(rid) => Handoff::Reference { rid },
                    Err(e) => {
                        tracing::error!(error = %e, "token exchange failed during callback");
                        return (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Html(views::error_page(
                                "We couldn't finish signing you in. Please open the link from your email again.",
                            )),
                        )
                            .into_response();
                    }
                },
            };
            Redirect::temporary(&links.universal(&handoff)).into_response()
        }
        RelayOutcome::AuthCode(code) => {
            Redirect::temporary(&links.universal(&Handoff::Code(code))).into_response()
        }
        RelayOutcome::ManualVisit => Html(views::manual_page(
            &links.universal(&Handoff::None),
            &links.fallback(&Handoff::None),
        ))
        .into_response(),
    }
}

/// Web password-reset page. The reset email's recovery session rides the
/// URL fragment and is consumed entirely in the browser by the provider's
/// client library; this server only hands out the public configuration.
pub async fn reset_password(State(state): State<Arc<AppState>>) -> Html<String> {
    match state.config.supabase_anon_key.as_deref() {
        Some(anon_key) => {
            let open_url = format!(
                "{}/open?next=discover",
                state.config.site_url.trim_end_matches('/')
            );
            Html(views::reset_password_page(
                &state.config.supabase_url,
                anon_key,
                &open_url,
            ))
        }
        None => {
            tracing::warn!("reset-password page requested but SUPABASE_ANON_KEY is not set");
            Html(views::reset_password_unconfigured())
        }
    }
}

/// Fallback for devices where OS universal-link routing did not fire:
/// re-offer the same payload on the custom scheme.
pub async fn open_fallback(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Html<String> {
    let params = query.unwrap_or_default();
    let deep_link = if params.is_empty() {
        format!("{}://auth/callback", state.config.app_scheme)
    } else {
        format!("{}://auth/callback?{}", state.config.app_scheme, params)
    };

    Html(views::open_fallback_page(&deep_link))
}
