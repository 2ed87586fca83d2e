use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::EmailSettings;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No API key configured; nothing left the process.
    Skipped,
}

#[derive(Clone)]
pub struct EmailService {
    client: Client,
    settings: EmailSettings,
}

impl EmailService {
    pub fn new(settings: EmailSettings) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client, settings })
    }

    pub fn is_configured(&self) -> bool {
        !self.settings.api_key.trim().is_empty()
    }

    pub fn message(&self, to: Vec<String>, subject: &str, text: String) -> EmailMessage {
        EmailMessage {
            from: self.settings.from.clone(),
            to,
            subject: subject.to_string(),
            text,
        }
    }

    pub async fn send(&self, message: &EmailMessage) -> AppResult<Delivery> {
        if !self.is_configured() {
            warn!(subject = %message.subject, "email key not configured; skipping send");
            return Ok(Delivery::Skipped);
        }
        if message.to.is_empty() {
            return Ok(Delivery::Skipped);
        }

        let response = self
            .client
            .post(format!("{}/emails", self.settings.base_url.trim_end_matches('/')))
            .bearer_auth(&self.settings.api_key)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        info!(recipients = message.to.len(), subject = %message.subject, "email sent");
        Ok(Delivery::Sent)
    }

    /// Sends one message per chunk of at most `batch_size` recipients and
    /// returns how many sends went out.
    pub async fn send_batched(
        &self,
        recipients: &[String],
        subject: &str,
        text: &str,
    ) -> AppResult<usize> {
        let mut sent = 0;
        for chunk in recipients.chunks(self.settings.batch_size.max(1)) {
            let message = self.message(chunk.to_vec(), subject, text.to_string());
            if self.send(&message).await? == Delivery::Sent {
                sent += 1;
            }
        }
        Ok(sent)
    }
}
