use async_trait::async_trait;
use tracing::info;

use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outbound notification side-channel. Best-effort from the service's point of
/// view: failures are logged by the caller, never propagated or retried.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError>;
}

/// Email client backed by an API token. The transport itself is a collaborator
/// with a trivial contract; only the handshake and dispatch are modeled here.
pub struct EmailClient {
    #[allow(dead_code)]
    token: String,
}

impl EmailClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Idempotent handshake, performed once at startup.
    pub fn connect(&self) {
        info!("email client connected");
    }
}

#[async_trait]
impl NotificationSender for EmailClient {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError> {
        info!(to = %message.to, subject = %message.subject, "sending email");
        Ok(())
    }
}
