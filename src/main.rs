use shifted_api::config::Config;
use shifted_api::modules::bridge::crud::SupabaseBridge;
use shifted_api::modules::waitlist::crud::SupabaseWaitlist;
use shifted_api::services::mailer::{Mailer, NoopMailer, SmtpMailer};
use shifted_api::services::rate_limit::FixedWindowLimiter;
use shifted_api::services::supabase::SupabaseClient;
use shifted_api::AppState;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shifted_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing backend credentials fail here, before we accept traffic.
    let config = Config::from_env().expect("Failed to load environment configuration");
    let port = config.port;

    let supabase = Arc::new(SupabaseClient::new(
        config.supabase_url.clone(),
        config.supabase_service_role_key.clone(),
    ));

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => Arc::new(
            SmtpMailer::new(smtp, config.email_debug).expect("Failed to build SMTP transport"),
        ),
        None => {
            tracing::warn!("SMTP not configured; waitlist confirmation emails are disabled");
            Arc::new(NoopMailer)
        }
    };

    let limiter = Arc::new(FixedWindowLimiter::new(
        config.waitlist_rate_limit,
        Duration::from_secs(config.waitlist_rate_window_secs),
    ));

    let state = AppState {
        waitlist_store: Arc::new(SupabaseWaitlist::new(supabase.clone())),
        bridge_store: Arc::new(SupabaseBridge::new(supabase)),
        mailer,
        limiter,
        config,
    };

    let app = shifted_api::create_app(state).await;

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await.unwrap();
}
