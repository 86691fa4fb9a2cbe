//! Email service for subscription notifications.
//!
//! Uses `lettre` for SMTP transport. Sending is best-effort: the
//! subscription write path treats a failed send as non-fatal.

use chrono::{DateTime, Utc};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Outbound email is disabled by configuration.
    #[error("email sending is disabled")]
    Disabled,
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for transactional notifications.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Whether outbound email is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        Ok(AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build())
    }

    /// Sends the subscription-ready notification.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Disabled` when email is turned off, or a
    /// build/send error from the SMTP transport.
    pub async fn send_subscription_email(
        &self,
        to_email: &str,
        duration_label: &str,
        expires_on: DateTime<Utc>,
    ) -> Result<(), EmailError> {
        if !self.config.enabled {
            return Err(EmailError::Disabled);
        }

        let subject = format!("Your {duration_label} subscription is ready - Tooldesk");
        let body = format!(
            r"Hi,

Your subscription has been activated.

Plan duration: {duration_label}
Valid until: {}

If you did not request this subscription, please contact support.

Best regards,
The Tooldesk Team",
            expires_on.format("%Y-%m-%d")
        );

        self.send_email(to_email, &subject, &body).await
    }

    /// Sends a generic plain-text email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be built or sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_service_refuses_to_send() {
        let service = EmailService::new(EmailConfig::default());
        assert!(!service.is_enabled());

        let result = service
            .send_subscription_email("someone@example.com", "6 Months", Utc::now())
            .await;
        assert!(matches!(result, Err(EmailError::Disabled)));
    }
}
