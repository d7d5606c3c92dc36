//! Inbound orchestrator events
//!
//! All orchestrator mutation flows through these events, processed one at a
//! time by a single state-update function. Externally-owned refresh loops
//! (balance/allowance polling) and the async transaction drivers feed the
//! same channel, which keeps tests free to inject synthetic observations.

use crate::amount::Amount;
use crate::lifecycle::TransactionState;
use crate::pool::TokenRef;

/// The tracked remote operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Approve,
    Swap,
}

/// Events consumed by the swap orchestrator
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeEvent {
    /// User edited the input amount (raw string, validated on receipt)
    FromValueChanged(String),
    /// User selected the token to swap from
    FromTokenSelected(TokenRef),
    /// User selected (or cleared) the token to swap to
    ToTokenSelected(Option<TokenRef>),
    /// Fresh balance observation for a token
    BalanceRefreshed {
        token: TokenRef,
        balance: Option<Amount>,
    },
    /// Fresh allowance observation for a token
    AllowanceRefreshed {
        token: TokenRef,
        allowance: Option<Amount>,
    },
    /// A transaction driver reported a lifecycle change
    LifecycleUpdate {
        operation: Operation,
        request_id: u64,
        state: TransactionState,
    },
    /// The outcome reset timer elapsed
    ResetTimerFired,
}
