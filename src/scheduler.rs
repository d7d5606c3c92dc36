//! Outcome reset scheduling
//!
//! After a terminal swap or approval outcome has been visible for a fixed
//! delay, the form state is cleared. Each new terminal outcome supersedes
//! the previous timer; pending clears never stack.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::events::ExchangeEvent;

/// Single-shot, supersedable timer emitting `ResetTimerFired`
pub struct ResetScheduler {
    event_sender: mpsc::UnboundedSender<ExchangeEvent>,
    delay: Duration,
    cancellation_token: Option<CancellationToken>,
}

impl ResetScheduler {
    pub fn new(event_sender: mpsc::UnboundedSender<ExchangeEvent>, delay: Duration) -> Self {
        Self {
            event_sender,
            delay,
            cancellation_token: None,
        }
    }

    /// Start (or restart) the reset timer
    ///
    /// A previously scheduled fire is cancelled; only the latest outcome's
    /// timer matters.
    pub fn schedule(&mut self) {
        self.cancel();

        let token = CancellationToken::new();
        let child = token.clone();
        let sender = self.event_sender.clone();
        let delay = self.delay;
        self.cancellation_token = Some(token);

        tokio::spawn(async move {
            tokio::select! {
                _ = child.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = sender.send(ExchangeEvent::ResetTimerFired);
                }
            }
        });
    }

    /// Cancel any pending fire
    pub fn cancel(&mut self) {
        if let Some(token) = self.cancellation_token.take() {
            token.cancel();
        }
    }
}

impl Drop for ResetScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
