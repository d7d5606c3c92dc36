//! Collaborator contract for on-chain access
//!
//! The orchestrator never talks to the chain directly; balance and allowance
//! reads and the two submittable operations live behind this trait. The RPC
//! endpoint and signer belong to the implementor.

use async_trait::async_trait;

use crate::amount::Amount;
use crate::error::Error;
use crate::lifecycle::TxHandle;
use crate::pool::TokenRef;

/// On-chain collaborator consumed by the orchestrator and background sync
#[async_trait]
pub trait SwapProvider: Send + Sync {
    /// Current balance of `token` held by `account`; `None` when unknown
    async fn get_balance(&self, token: &TokenRef, account: &str)
        -> Result<Option<Amount>, Error>;

    /// Current allowance granted by `owner` to `spender` on `token`;
    /// `None` when unknown
    async fn get_allowance(
        &self,
        token: &TokenRef,
        owner: &str,
        spender: &str,
    ) -> Result<Option<Amount>, Error>;

    /// Submit an allowance approval for `spender` on `token`
    async fn submit_approve(
        &self,
        token: &TokenRef,
        spender: &str,
        amount: Amount,
    ) -> Result<TxHandle, Error>;

    /// Submit an exact-in swap along `path`, payable to `recipient`, valid
    /// until the unix timestamp `deadline`
    async fn submit_swap(
        &self,
        amount_in: Amount,
        amount_out_min: Amount,
        path: Vec<TokenRef>,
        recipient: &str,
        deadline: i64,
    ) -> Result<TxHandle, Error>;
}
