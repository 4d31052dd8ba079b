//! Notifier that writes messages to the structured log.

use crate::notification::{
    domain::OutboundMessage,
    ports::{Notifier, NotifierResult},
};
use async_trait::async_trait;
use tracing::info;

/// Logs every message instead of delivering it.
///
/// Used by the sweep binary when no mail transport is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, message: &OutboundMessage) -> NotifierResult<()> {
        info!(
            subject = message.subject(),
            recipients = %message.recipients().join(", "),
            "notification sent"
        );
        Ok(())
    }
}
