use async_trait::async_trait;
use thiserror::Error;

/// Error returned by the mail collaborator
#[derive(Error, Debug)]
pub enum SendError {
    #[error("provider failure: {0}")]
    Provider(String),
}

/// Outbound email collaborator
///
/// Narrow seam in front of whatever provider delivers mail. Callers must
/// consult the cooldown gate before invoking `send`, and record the cooldown
/// only after `send` returns Ok.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), SendError>;
}

/// Mailer that logs messages instead of delivering them
///
/// Used in development and when no provider is configured.
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: String) -> Self {
        Self { from }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), SendError> {
        tracing::info!(
            "Email (not delivered) from {} to {}: {} | {}",
            self.from,
            to,
            subject,
            body
        );
        Ok(())
    }
}
