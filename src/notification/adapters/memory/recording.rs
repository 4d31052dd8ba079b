//! Notifier that records every delivery attempt.

use crate::notification::{
    domain::OutboundMessage,
    ports::{Notifier, NotifierError, NotifierResult},
};
use async_trait::async_trait;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

/// Thread-safe notifier that keeps every message it is asked to send.
///
/// Can be switched into a failing mode, or made to stall, to exercise
/// dispatcher error handling.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    attempts: Arc<RwLock<Vec<OutboundMessage>>>,
    failing: Arc<AtomicBool>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl RecordingNotifier {
    /// Creates a notifier that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes subsequent sends sleep before completing.
    pub fn set_delay(&self, delay: Option<Duration>) {
        if let Ok(mut slot) = self.delay.write() {
            *slot = delay;
        }
    }

    /// Returns every message passed to [`Notifier::send`], in call order.
    #[must_use]
    pub fn attempts(&self) -> Vec<OutboundMessage> {
        self.attempts
            .read()
            .map(|attempts| attempts.clone())
            .unwrap_or_default()
    }

    /// Returns the number of send attempts.
    #[must_use]
    pub fn attempt_count(&self) -> usize {
        self.attempts.read().map(|attempts| attempts.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &OutboundMessage) -> NotifierResult<()> {
        self.attempts
            .write()
            .map_err(|err| NotifierError::transport(std::io::Error::other(err.to_string())))?
            .push(message.clone());

        let delay = self.delay.read().ok().and_then(|slot| *slot);
        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifierError::Rejected("recording notifier set to fail".to_owned()));
        }
        Ok(())
    }
}
