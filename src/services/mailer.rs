use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::SmtpConfig;

/// Upper bound on a single background send attempt, connect included.
const SEND_DEADLINE: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("invalid mail address: {0}")]
    Address(String),
    #[error("failed to build message: {0}")]
    Message(String),
    #[error("SMTP transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_waitlist_confirmation(&self, to: &str, already: bool) -> Result<(), MailerError>;
}

/// Sends through the configured SMTP relay over STARTTLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    debug: bool,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, debug: bool) -> Result<Self, MailerError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailerError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .timeout(Some(Duration::from_secs(10)))
            .build();

        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .map_err(|e: lettre::address::AddressError| MailerError::Address(e.to_string()))?;

        Ok(Self {
            transport,
            from,
            debug,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_waitlist_confirmation(&self, to: &str, already: bool) -> Result<(), MailerError> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|e: lettre::address::AddressError| MailerError::Address(e.to_string()))?;

        if self.debug {
            tracing::info!(
                to = %mask_email(to),
                from = %self.from,
                already,
                "attempting waitlist confirmation send"
            );
        }

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(waitlist_subject(already))
            .multipart(MultiPart::alternative_plain_html(
                waitlist_text(already).to_string(),
                waitlist_html(already),
            ))
            .map_err(|e| MailerError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailerError::Transport(e.to_string()))
    }
}

/// Stand-in when SMTP is not configured. The signup flow still succeeds;
/// the skip is only visible in logs.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send_waitlist_confirmation(&self, to: &str, already: bool) -> Result<(), MailerError> {
        tracing::debug!(
            to = %mask_email(to),
            already,
            "SMTP not configured, skipping waitlist confirmation"
        );
        Ok(())
    }
}

/// Fire-and-forget confirmation dispatch. Never blocks or fails the
/// calling request; the attempt is bounded by `SEND_DEADLINE` and its
/// outcome goes to the logs only.
pub fn dispatch_confirmation(mailer: Arc<dyn Mailer>, to: String, already: bool) {
    tokio::spawn(async move {
        let masked = mask_email(&to);
        match tokio::time::timeout(SEND_DEADLINE, mailer.send_waitlist_confirmation(&to, already))
            .await
        {
            Ok(Ok(())) => {
                tracing::info!(to = %masked, already, "waitlist confirmation sent");
            }
            Ok(Err(e)) => {
                tracing::warn!(to = %masked, error = %e, "waitlist confirmation failed");
            }
            Err(_) => {
                tracing::warn!(
                    to = %masked,
                    deadline_secs = SEND_DEADLINE.as_secs(),
                    "waitlist confirmation timed out"
                );
            }
        }
    });
}

fn waitlist_subject(already: bool) -> &'static str {
    if already {
        "You're already on the Shifted waitlist"
    } else {
        "You're on the Shifted waitlist"
    }
}

fn waitlist_text(already: bool) -> &'static str {
    if already {
        "You're already on our list. We'll email you a TestFlight invite as soon as a spot opens."
    } else {
        "Thanks for joining. We'll email you a TestFlight invite as soon as a spot opens."
    }
}

fn waitlist_html(already: bool) -> String {
    let headline = if already {
        "You're already on the waitlist"
    } else {
        "You're on the waitlist"
    };

    format!(
        r#"<div style="font-family: system-ui; background:#05070A; padding:24px;">
  <div style="max-width:520px; margin:auto; background:#0b1620; border-radius:16px; padding:22px;">
    <h1 style="color:#fff">{headline}</h1>
    <p style="color:#9ca3af">{body}</p>
    <p style="color:#6b7280; font-size:12px; margin-top:16px">
      Need help? <a href="mailto:support@shifteddating.com" style="color:#00ff88">support@shifteddating.com</a>
    </p>
  </div>
</div>"#,
        headline = headline,
        body = waitlist_text(already),
    )
}

/// Keeps recipient addresses out of the logs: `jo***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.chars().count() > 2 => {
            let prefix: String = local.chars().take(2).collect();
            format!("{}***@{}", prefix, domain)
        }
        Some((_, domain)) => format!("***@{}", domain),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_email_keeps_only_a_short_prefix_and_domain() {
        assert_eq!(mask_email("jordan@example.com"), "jo***@example.com");
        assert_eq!(mask_email("ab@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn subject_and_body_distinguish_repeat_signups() {
        assert!(waitlist_subject(true).contains("already"));
        assert!(!waitlist_subject(false).contains("already"));
        assert!(waitlist_html(true).contains("already on the waitlist"));
        assert!(waitlist_html(false).contains("on the waitlist"));
    }
}
