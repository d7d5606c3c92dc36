//! Background balance/allowance sync
//!
//! Polls the provider on fixed intervals and pushes fresh observations into
//! the orchestrator's event channel. The orchestrator itself never polls;
//! it only consumes the resulting events, so tests can drive it with
//! synthetic observations instead.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::events::ExchangeEvent;
use crate::pool::TokenRef;
use crate::provider::SwapProvider;

/// Polling intervals for background refresh
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Interval for balance refresh (default: 10 seconds)
    pub balance_refresh_interval: Duration,
    /// Interval for allowance refresh (default: 10 seconds)
    pub allowance_refresh_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            balance_refresh_interval: Duration::from_secs(10),
            allowance_refresh_interval: Duration::from_secs(10),
        }
    }
}

/// Background sync manager feeding balance/allowance events
pub struct SyncManager {
    /// Event sender for communicating with the orchestrator
    event_sender: mpsc::UnboundedSender<ExchangeEvent>,
    /// Provider used for reads
    provider: Arc<dyn SwapProvider>,
    /// Sync configuration
    config: SyncConfig,
    /// Account whose balance is tracked
    account: String,
    /// Router spender the allowance is checked against
    spender: String,
    /// Currently tracked token; retargetable while tasks run
    token: watch::Sender<Option<TokenRef>>,
    /// Background task handles
    task_handles: Vec<tokio::task::JoinHandle<()>>,
    /// Cancellation token for graceful shutdown
    cancellation_token: CancellationToken,
}

impl SyncManager {
    pub fn new(
        event_sender: mpsc::UnboundedSender<ExchangeEvent>,
        provider: Arc<dyn SwapProvider>,
        account: impl Into<String>,
        spender: impl Into<String>,
        config: Option<SyncConfig>,
    ) -> Self {
        Self {
            event_sender,
            provider,
            config: config.unwrap_or_default(),
            account: account.into(),
            spender: spender.into(),
            token: watch::channel(None).0,
            task_handles: Vec::new(),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Point the polling loops at a new token; `None` pauses them
    ///
    /// `send_replace` stores the value even before any polling task has
    /// subscribed, so targeting before `start_background_sync` works.
    pub fn set_token(&self, token: Option<TokenRef>) {
        self.token.send_replace(token);
    }

    /// Start the balance and allowance polling tasks
    pub fn start_background_sync(&mut self) {
        self.start_balance_sync();
        self.start_allowance_sync();
    }

    fn start_balance_sync(&mut self) {
        let sender = self.event_sender.clone();
        let provider = Arc::clone(&self.provider);
        let account = self.account.clone();
        let token_rx = self.token.subscribe();
        let cancellation_token = self.cancellation_token.clone();
        let refresh_interval = self.config.balance_refresh_interval;

        let handle = tokio::spawn(async move {
            let mut interval = interval(refresh_interval);
            loop {
                tokio::select! {
                    _ = cancellation_token.cancelled() => break,
                    _ = interval.tick() => {
                        let Some(token) = token_rx.borrow().clone() else { continue };
                        match provider.get_balance(&token, &account).await {
                            Ok(balance) => {
                                let _ = sender.send(ExchangeEvent::BalanceRefreshed {
                                    token,
                                    balance,
                                });
                            }
                            Err(e) => warn!(token = %token, "balance refresh failed: {}", e),
                        }
                    }
                }
            }
        });

        self.task_handles.push(handle);
    }

    fn start_allowance_sync(&mut self) {
        let sender = self.event_sender.clone();
        let provider = Arc::clone(&self.provider);
        let account = self.account.clone();
        let spender = self.spender.clone();
        let token_rx = self.token.subscribe();
        let cancellation_token = self.cancellation_token.clone();
        let refresh_interval = self.config.allowance_refresh_interval;

        let handle = tokio::spawn(async move {
            let mut interval = interval(refresh_interval);
            loop {
                tokio::select! {
                    _ = cancellation_token.cancelled() => break,
                    _ = interval.tick() => {
                        let Some(token) = token_rx.borrow().clone() else { continue };
                        match provider.get_allowance(&token, &account, &spender).await {
                            Ok(allowance) => {
                                let _ = sender.send(ExchangeEvent::AllowanceRefreshed {
                                    token,
                                    allowance,
                                });
                            }
                            Err(e) => warn!(token = %token, "allowance refresh failed: {}", e),
                        }
                    }
                }
            }
        });

        self.task_handles.push(handle);
    }

    /// Stop all polling tasks
    pub fn shutdown(&mut self) {
        self.cancellation_token.cancel();
        for handle in self.task_handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for SyncManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
