//! Outbound email port.

use async_trait::async_trait;

/// A fully composed email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Mailer trait - abstraction over transactional email providers.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;

    /// False when dispatch is switched off for lack of credentials.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Email dispatch errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("Provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}
