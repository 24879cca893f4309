use std::env;

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_service_role_key: String,
    /// Public (anon) key handed to browser pages that talk to the auth
    /// provider themselves, like the password-reset page. Optional: when
    /// absent those pages render a configuration notice instead.
    pub supabase_anon_key: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub site_url: String,
    pub app_scheme: String,
    pub bridge_strategy: BridgeStrategy,
    pub waitlist_rate_limit: u32,
    pub waitlist_rate_window_secs: u64,
    pub email_debug: bool,
    pub port: u16,
}

/// SMTP relay settings. Only present when the relay is fully configured;
/// without it the confirmation-email path is disabled, not an error.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from_name: String,
    pub from_email: String,
}

/// How the auth callback hands session tokens to the app: embed them
/// directly in the deep link, or exchange them for a one-time reference id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeStrategy {
    Direct,
    Reference,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let supabase_url = env::var("SUPABASE_URL")
            .map_err(|_| "SUPABASE_URL must be set".to_string())?;

        let supabase_service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .map_err(|_| "SUPABASE_SERVICE_ROLE_KEY must be set".to_string())?;

        let supabase_anon_key = env::var("SUPABASE_ANON_KEY").ok();

        let smtp = Self::smtp_from_env()?;

        let site_url = env::var("PUBLIC_SITE_URL")
            .unwrap_or_else(|_| "https://www.shifteddating.com".to_string());

        let app_scheme = env::var("APP_SCHEME").unwrap_or_else(|_| "shifted".to_string());

        let bridge_strategy = match env::var("BRIDGE_STRATEGY").as_deref() {
            Ok("direct") => BridgeStrategy::Direct,
            Ok("reference") | Err(_) => BridgeStrategy::Reference,
            Ok(other) => return Err(format!("BRIDGE_STRATEGY must be 'direct' or 'reference', got '{}'", other)),
        };

        let waitlist_rate_limit = env::var("WAITLIST_RATE_LIMIT")
            .ok()
            .map(|v| v.parse::<u32>().map_err(|_| "WAITLIST_RATE_LIMIT must be a number".to_string()))
            .transpose()?
            .unwrap_or(10);

        let waitlist_rate_window_secs = env::var("WAITLIST_RATE_WINDOW_SECS")
            .ok()
            .map(|v| v.parse::<u64>().map_err(|_| "WAITLIST_RATE_WINDOW_SECS must be a number".to_string()))
            .transpose()?
            .unwrap_or(600);

        let email_debug = matches!(
            env::var("EMAIL_DEBUG").as_deref(),
            Ok("1") | Ok("true") | Ok("yes")
        );

        let port = env::var("PORT")
            .ok()
            .map(|v| v.parse::<u16>().map_err(|_| "PORT must be a number".to_string()))
            .transpose()?
            .unwrap_or(3000);

        Ok(Self {
            supabase_url,
            supabase_service_role_key,
            supabase_anon_key,
            smtp,
            site_url,
            app_scheme,
            bridge_strategy,
            waitlist_rate_limit,
            waitlist_rate_window_secs,
            email_debug,
            port,
        })
    }

    fn smtp_from_env() -> Result<Option<SmtpConfig>, String> {
        let host = env::var("SMTP_HOST").ok();
        let user = env::var("SMTP_USER").ok();
        let pass = env::var("SMTP_PASS").ok();

        let (host, user, pass) = match (host, user, pass) {
            (Some(h), Some(u), Some(p)) => (h, u, p),
            // Partial config is treated as absent; the email path is optional.
            _ => return Ok(None),
        };

        let port = env::var("SMTP_PORT")
            .ok()
            .map(|v| v.parse::<u16>().map_err(|_| "SMTP_PORT must be a number".to_string()))
            .transpose()?
            .unwrap_or(587);

        let from_name = env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Shifted Dating".to_string());
        let from_email = env::var("SMTP_FROM_EMAIL").unwrap_or_else(|_| user.clone());

        Ok(Some(SmtpConfig {
            host,
            port,
            user,
            pass,
            from_name,
            from_email,
        }))
    }
}
