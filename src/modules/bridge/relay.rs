//! Token-relay logic for the auth callback: merge the URL parameter sets,
//! decide what the provider handed us, and build the deep links that carry
//! the payload into the app.

use std::collections::HashMap;
use url::form_urlencoded;

use super::model::TokenPair;

/// Destination screen the app opens after a successful handoff.
const DEFAULT_NEXT: &str = "profile-setup";

/// The merged parameter set of a callback URL. The auth provider delivers
/// the payload either in the query string (PKCE code flow) or in the
/// fragment (token flow); on a key clash the fragment wins.
#[derive(Debug)]
pub struct CallbackParams {
    map: HashMap<String, String>,
}

impl CallbackParams {
    pub fn from_parts(query: Option<&str>, fragment: Option<&str>) -> Self {
        let mut map = HashMap::new();
        // Fragment parsed last so its values override the query's.
        for part in [query, fragment].into_iter().flatten() {
            for (k, v) in form_urlencoded::parse(part.as_bytes()) {
                map.insert(k.into_owned(), v.into_owned());
            }
        }
        Self { map }
    }

    /// Empty values are treated as absent.
    fn non_empty(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Provider-reported failure (expired link, invalid request). Surfaced
    /// to the user verbatim; never redirects.
    ProviderError { description: String },
    /// Full session payload; hand off to the app.
    SessionTokens(TokenPair),
    /// PKCE authorization code; the app performs the exchange itself.
    AuthCode(String),
    /// No payload at all. Expected when someone opens the page by hand.
    ManualVisit,
}

/// Ordered decision over the merged parameters; first match wins.
pub fn decide(params: &CallbackParams) -> RelayOutcome {
    if params.non_empty("error").is_some() || params.non_empty("error_code").is_some() {
        let description = params
            .non_empty("error_description")
            .or_else(|| params.non_empty("error_code"))
            .or_else(|| params.non_empty("error"))
            .unwrap_or("The sign-in link is invalid or has expired.")
            .to_string();
        return RelayOutcome::ProviderError { description };
    }

    if let (Some(access), Some(refresh)) = (
        params.non_empty("access_token"),
        params.non_empty("refresh_token"),
    ) {
        return RelayOutcome::SessionTokens(TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        });
    }

    if let Some(code) = params.non_empty("code") {
        return RelayOutcome::AuthCode(code.to_string());
    }

    RelayOutcome::ManualVisit
}

/// What actually rides on the deep link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    /// One-time reference id; the app resolves it via the recovery bridge.
    /// Preferred: keeps long-lived credentials out of logs and history.
    Reference { rid: String },
    /// Raw tokens as query parameters.
    Direct(TokenPair),
    /// PKCE code, forwarded untouched.
    Code(String),
    /// Manual visit; the link only tells the app where to land.
    None,
}

/// Builds the universal link (web-domain, OS-routed) and the custom-scheme
/// fallback for a given handoff.
pub struct LinkBuilder {
    site_url: String,
    app_scheme: String,
    next: String,
}

impl LinkBuilder {
    pub fn new(site_url: &str, app_scheme: &str) -> Self {
        Self {
            site_url: site_url.trim_end_matches('/').to_string(),
            app_scheme: app_scheme.to_string(),
            next: DEFAULT_NEXT.to_string(),
        }
    }

    pub fn universal(&self, handoff: &Handoff) -> String {
        format!("{}/open?{}", self.site_url, self.query(handoff))
    }

    /// Universal-link routing is not guaranteed to fire on every
    /// device/browser combination; this link is the manual escape hatch.
    pub fn fallback(&self, handoff: &Handoff) -> String {
        format!("{}://auth/callback?{}", self.app_scheme, self.query(handoff))
    }

    fn query(&self, handoff: &Handoff) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("next", &self.next);

        match handoff {
            Handoff::Reference { rid } => {
                serializer.append_pair("rid", rid);
            }
            Handoff::Direct(tokens) => {
                serializer.append_pair("access_token", &tokens.access_token);
                serializer.append_pair("refresh_token", &tokens.refresh_token);
            }
            Handoff::Code(code) => {
                serializer.append_pair("code", code);
            }
            Handoff::None => {}
        }

        serializer.finish()
    }
}
