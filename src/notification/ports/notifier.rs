//! Outbound message transport contract.

use crate::notification::domain::OutboundMessage;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notifier operations.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Message transport, typically SMTP or an email API.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempts delivery of a rendered message to its recipients.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when the transport refuses or fails to
    /// deliver the message. Callers treat every error as non-fatal.
    async fn send(&self, message: &OutboundMessage) -> NotifierResult<()>;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The transport refused the message.
    #[error("message rejected: {0}")]
    Rejected(String),

    /// The transport failed.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
