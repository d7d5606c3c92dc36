//! Transaction lifecycle tracking
//!
//! Each submitted remote call gets a `TxHandle` whose status the provider
//! drives through signature, mining, and settlement. The orchestrator keeps
//! a `TransactionLifecycle` per tracked operation (one for approval, one for
//! swap) and mirrors handle updates into it.

use tokio::sync::watch;

/// Status of a tracked remote operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TxStatus {
    /// No call issued
    #[default]
    Idle,
    /// Call issued, awaiting the signer
    PendingSignature,
    /// Signed and broadcast, awaiting confirmation
    PendingMining,
    /// Confirmed on-chain (terminal)
    Success,
    /// Rejected by the signer, reverted, or errored (terminal)
    Failed,
}

impl TxStatus {
    /// Whether a call is in flight
    pub fn is_pending(&self) -> bool {
        matches!(self, TxStatus::PendingSignature | TxStatus::PendingMining)
    }

    /// Whether no further transitions can occur without a new request
    pub fn is_terminal(&self) -> bool {
        matches!(self, TxStatus::Success | TxStatus::Failed)
    }
}

/// Observable snapshot of a remote operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionState {
    pub status: TxStatus,
    /// Human-readable failure reason, set only when `status` is `Failed`
    pub error: Option<String>,
}

impl TransactionState {
    pub fn pending_signature() -> Self {
        Self {
            status: TxStatus::PendingSignature,
            error: None,
        }
    }

    pub fn mining() -> Self {
        Self {
            status: TxStatus::PendingMining,
            error: None,
        }
    }

    pub fn success() -> Self {
        Self {
            status: TxStatus::Success,
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: TxStatus::Failed,
            error: Some(reason.into()),
        }
    }
}

/// Handle to an in-flight remote call
///
/// Created by the provider at submission time; the paired sender drives the
/// status forward. The handle performs no retries and cannot cancel the
/// underlying call.
pub struct TxHandle {
    receiver: watch::Receiver<TransactionState>,
}

impl TxHandle {
    /// Create a handle and its driving sender, starting at
    /// `PendingSignature`
    pub fn channel() -> (watch::Sender<TransactionState>, TxHandle) {
        let (tx, rx) = watch::channel(TransactionState::pending_signature());
        (tx, TxHandle { receiver: rx })
    }

    /// Current state without waiting
    pub fn current(&self) -> TransactionState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next state change; `None` once the sender is dropped
    pub async fn changed(&mut self) -> Option<TransactionState> {
        if self.receiver.changed().await.is_err() {
            return None;
        }
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Wait until the operation settles into a terminal state
    ///
    /// If the sender is dropped before settling, the operation is reported
    /// as failed.
    pub async fn settled(mut self) -> TransactionState {
        loop {
            let current = self.current();
            if current.status.is_terminal() {
                return current;
            }
            if self.changed().await.is_none() {
                return TransactionState::failed("transaction handle dropped before settlement");
            }
        }
    }
}

/// Orchestrator-side tracker for one operation
///
/// Exactly one lifecycle exists per tracked operation at a time; a new
/// request is only issued once the previous one is terminal (enforced by the
/// orchestrator's eligibility checks) or after an explicit reset.
#[derive(Debug, Clone, Default)]
pub struct TransactionLifecycle {
    state: TransactionState,
}

impl TransactionLifecycle {
    /// Mark a freshly issued call
    pub fn begin(&mut self) {
        self.state = TransactionState::pending_signature();
    }

    /// Mirror a state reported by the handle driver
    pub fn update(&mut self, state: TransactionState) {
        self.state = state;
    }

    /// Return to `Idle`, discarding any terminal outcome
    pub fn reset(&mut self) {
        self.state = TransactionState::default();
    }

    pub fn state(&self) -> &TransactionState {
        &self.state
    }

    pub fn status(&self) -> &TxStatus {
        &self.state.status
    }

    pub fn is_pending(&self) -> bool {
        self.state.status.is_pending()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.status.is_terminal()
    }

    pub fn succeeded(&self) -> bool {
        self.state.status == TxStatus::Success
    }

    pub fn error_message(&self) -> Option<&str> {
        self.state.error.as_deref()
    }
}
