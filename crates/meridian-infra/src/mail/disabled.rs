use async_trait::async_trait;

use meridian_core::ports::{EmailMessage, MailError, Mailer};

/// Mailer used when no provider key is configured. Accepts and drops.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::debug!(subject = %message.subject, "Email disabled, message dropped");
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
