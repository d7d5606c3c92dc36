pub mod amount;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod orchestrator;
pub mod pool;
pub mod provider;
pub mod scheduler;
pub mod sync;

pub use amount::{Amount, AmountError};
pub use config::{ExchangeConfig, NetworkConstants, TokenInfo};
pub use eligibility::{BlockingReason, Eligibility, SwapAction};
pub use error::Error;
pub use events::{ExchangeEvent, Operation};
pub use lifecycle::{TransactionLifecycle, TransactionState, TxHandle, TxStatus};
pub use orchestrator::SwapOrchestrator;
pub use pool::{available_tokens, counterpart_tokens, find_pool_by_tokens, Pool, TokenRef};
pub use provider::SwapProvider;
pub use scheduler::ResetScheduler;
pub use sync::{SyncConfig, SyncManager};
