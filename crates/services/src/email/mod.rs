use reqwest::Client;
use serde::Serialize;
use taskwise_config::EmailSettings;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Mail API returned status {0}")]
    UnexpectedStatus(u16),
}

#[derive(Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Transactional mail over an HTTP JSON API. With no `api_url` configured
/// the mailer degrades to logging, so local setups need no mail account.
pub struct Mailer {
    settings: EmailSettings,
    client: Client,
}

impl Mailer {
    pub fn new(settings: EmailSettings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }

    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        if self.settings.api_url.is_empty() {
            info!(to, subject, "Mail delivery disabled, dropping message");
            return Ok(());
        }

        let response = self
            .client
            .post(&self.settings.api_url)
            .bearer_auth(&self.settings.api_key)
            .json(&MailPayload {
                from: &self.settings.sender,
                to,
                subject,
                html,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(to, status = %response.status(), "Mail API rejected the message");
            return Err(MailError::UnexpectedStatus(response.status().as_u16()));
        }
        Ok(())
    }

    pub async fn send_reset_code(&self, to: &str, code: &str) -> Result<(), MailError> {
        let html = format!(
            "<p>Your password reset code is <strong>{}</strong>. \
             It expires in 10 minutes.</p>",
            code
        );
        self.send(to, "Password reset code", &html).await
    }
}
