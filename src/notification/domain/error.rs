//! Errors raised while building notification content.

use thiserror::Error;

/// A notification template failed to render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to render {template} template: {reason}")]
pub struct NotificationTemplateError {
    /// Template that failed.
    pub template: &'static str,
    /// Renderer error message.
    pub reason: String,
}
