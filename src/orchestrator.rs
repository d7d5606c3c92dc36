//! Swap orchestration
//!
//! The orchestrator owns the whole exchange session: the entered amount, the
//! token selection, the two transaction lifecycles (approval and swap), and
//! the outcome/reset cycle. All mutation arrives as `ExchangeEvent`s handled
//! one at a time; everything else is derived on read.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::amount::Amount;
use crate::config::ExchangeConfig;
use crate::eligibility::{BlockingReason, Eligibility, SwapAction};
use crate::error::Error;
use crate::events::{ExchangeEvent, Operation};
use crate::lifecycle::{TransactionLifecycle, TransactionState, TxHandle, TxStatus};
use crate::pool::{self, Pool, TokenRef};
use crate::provider::SwapProvider;
use crate::scheduler::ResetScheduler;

/// One tracked remote request and the selection it was issued for
///
/// A lifecycle started for one token pair is meaningless after the user
/// switches pairs; the recorded tokens let a selection change invalidate
/// exactly the lifecycles that no longer apply. The request id lets updates
/// from superseded driver tasks be dropped instead of corrupting state.
#[derive(Debug, Default)]
struct TrackedRequest {
    lifecycle: TransactionLifecycle,
    request_id: u64,
    from: Option<TokenRef>,
    to: Option<TokenRef>,
}

impl TrackedRequest {
    fn begin(&mut self, request_id: u64, from: TokenRef, to: Option<TokenRef>) {
        self.lifecycle.begin();
        self.request_id = request_id;
        self.from = Some(from);
        self.to = to;
    }

    /// Whether the request still applies to the current selection
    fn matches_selection(&self, from: &TokenRef, to: Option<&TokenRef>) -> bool {
        if self.from.as_ref() != Some(from) {
            return false;
        }
        match &self.to {
            Some(issued_to) => to == Some(issued_to),
            None => true,
        }
    }

    /// Discard the lifecycle and retire its request id
    fn invalidate(&mut self, fresh_id: u64) {
        self.lifecycle.reset();
        self.request_id = fresh_id;
        self.from = None;
        self.to = None;
    }
}

/// Orchestrates the allowance-then-swap transaction flow for one session
pub struct SwapOrchestrator {
    provider: Arc<dyn SwapProvider>,
    config: ExchangeConfig,
    /// Account swaps are executed for
    account: String,
    /// Pool set the session operates over
    pools: Vec<Pool>,
    /// Raw entered value; retained verbatim while it parses
    from_value: String,
    /// Parsed entered amount, never invalid
    amount_in: Amount,
    from_token: TokenRef,
    to_token: Option<TokenRef>,
    /// Last observed balance of `from_token`; `None` until first refresh
    balance_in: Option<Amount>,
    /// Last observed router allowance on `from_token`
    allowance: Option<Amount>,
    approval: TrackedRequest,
    swap: TrackedRequest,
    next_request_id: u64,
    /// Whether a swap has been requested in this outcome cycle
    swap_requested: bool,
    /// Set when the reset timer has cleared the form for a new cycle
    reset_flag: bool,
    scheduler: ResetScheduler,
    events_tx: mpsc::UnboundedSender<ExchangeEvent>,
    events_rx: mpsc::UnboundedReceiver<ExchangeEvent>,
}

impl SwapOrchestrator {
    /// Create a session over a pool set
    ///
    /// The initial from-token is the first token of the first pool, matching
    /// the selection the UI starts from.
    pub fn new(
        provider: Arc<dyn SwapProvider>,
        config: ExchangeConfig,
        account: impl Into<String>,
        pools: Vec<Pool>,
    ) -> Result<Self, Error> {
        let from_token = pools
            .first()
            .map(|p| p.token0.clone())
            .ok_or_else(|| Error::Config("pool set is empty".to_string()))?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let scheduler = ResetScheduler::new(events_tx.clone(), config.reset_delay());
        let decimals = config.token_decimals(from_token.as_str());

        Ok(Self {
            provider,
            account: account.into(),
            pools,
            from_value: "0".to_string(),
            amount_in: Amount::zero(decimals),
            from_token,
            to_token: None,
            balance_in: None,
            allowance: None,
            approval: TrackedRequest::default(),
            swap: TrackedRequest::default(),
            next_request_id: 0,
            swap_requested: false,
            reset_flag: false,
            scheduler,
            events_tx,
            events_rx,
            config,
        })
    }

    /// Sender for feeding events from outside (sync loops, UI, tests)
    pub fn event_sender(&self) -> mpsc::UnboundedSender<ExchangeEvent> {
        self.events_tx.clone()
    }

    /// Receive and apply the next queued event
    ///
    /// Returns the event that was applied, or `None` once the channel is
    /// closed.
    pub async fn process_next(&mut self) -> Option<ExchangeEvent> {
        let event = self.events_rx.recv().await?;
        self.handle_event(event.clone());
        Some(event)
    }

    /// Single state-update function; events are applied one at a time
    pub fn handle_event(&mut self, event: ExchangeEvent) {
        match event {
            ExchangeEvent::FromValueChanged(value) => self.on_from_value_changed(value),
            ExchangeEvent::FromTokenSelected(token) => self.on_from_token_selected(token),
            ExchangeEvent::ToTokenSelected(token) => self.on_to_token_selected(token),
            ExchangeEvent::BalanceRefreshed { token, balance } => {
                if token == self.from_token {
                    self.balance_in = balance;
                }
            }
            ExchangeEvent::AllowanceRefreshed { token, allowance } => {
                if token == self.from_token {
                    self.allowance = allowance;
                }
            }
            ExchangeEvent::LifecycleUpdate {
                operation,
                request_id,
                state,
            } => self.on_lifecycle_update(operation, request_id, state),
            ExchangeEvent::ResetTimerFired => self.on_reset_timer_fired(),
        }
    }

    fn on_from_value_changed(&mut self, value: String) {
        let decimals = self.config.token_decimals(self.from_token.as_str());
        match Amount::parse(&value, decimals) {
            Ok(amount) => {
                self.from_value = value;
                self.amount_in = amount;
                self.reset_flag = false;
            }
            // malformed entry: previous valid amount is retained and no
            // error surfaces
            Err(e) => debug!("rejected amount input {:?}: {}", value, e),
        }
    }

    fn on_from_token_selected(&mut self, token: TokenRef) {
        if token == self.from_token {
            return;
        }
        info!(from = %token, "from-token changed");
        self.from_token = token;
        // observations belong to the previous token
        self.balance_in = None;
        self.allowance = None;
        // re-scale the entered value at the new token's decimals; if it no
        // longer parses there, clear it so the shown value and the parsed
        // amount stay in agreement
        let decimals = self.config.token_decimals(self.from_token.as_str());
        match Amount::parse(&self.from_value, decimals) {
            Ok(amount) => self.amount_in = amount,
            Err(_) => self.clear_amount(),
        }
        self.invalidate_stale_lifecycles();
        self.reset_flag = false;
    }

    fn on_to_token_selected(&mut self, token: Option<TokenRef>) {
        if token == self.to_token {
            return;
        }
        self.to_token = token;
        self.invalidate_stale_lifecycles();
        self.reset_flag = false;
    }

    /// Drop lifecycles whose recorded selection no longer matches
    ///
    /// The approval is tied only to the from-token, so changing the to-token
    /// leaves a pending approval alone; the swap is tied to the whole pair.
    fn invalidate_stale_lifecycles(&mut self) {
        if *self.approval.lifecycle.status() != TxStatus::Idle
            && !self.approval.matches_selection(&self.from_token, None)
        {
            let id = self.next_request_id();
            debug!("invalidating approval lifecycle for previous selection");
            self.approval.invalidate(id);
        }
        if *self.swap.lifecycle.status() != TxStatus::Idle
            && !self
                .swap
                .matches_selection(&self.from_token, self.to_token.as_ref())
        {
            let id = self.next_request_id();
            debug!("invalidating swap lifecycle for previous pair");
            self.swap.invalidate(id);
        }
    }

    fn on_lifecycle_update(&mut self, operation: Operation, request_id: u64, state: TransactionState) {
        let tracked = match operation {
            Operation::Approve => &mut self.approval,
            Operation::Swap => &mut self.swap,
        };
        if tracked.request_id != request_id {
            debug!(?operation, request_id, "dropping stale lifecycle update");
            return;
        }

        let terminal = state.status.is_terminal();
        tracked.lifecycle.update(state);

        if terminal {
            info!(?operation, status = ?tracked.lifecycle.status(), "operation settled");
            if operation == Operation::Swap && self.swap.lifecycle.succeeded() {
                // cleared only once the handle resolved, never optimistically
                self.clear_amount();
            }
            // a newer terminal outcome supersedes any pending clear
            self.scheduler.schedule();
        }
    }

    fn on_reset_timer_fired(&mut self) {
        info!("outcome displayed long enough, clearing form state");
        self.clear_amount();
        self.to_token = None;
        let id = self.next_request_id();
        self.approval.invalidate(id);
        let id = self.next_request_id();
        self.swap.invalidate(id);
        self.swap_requested = false;
        self.reset_flag = true;
    }

    fn clear_amount(&mut self) {
        let decimals = self.config.token_decimals(self.from_token.as_str());
        self.from_value = "0".to_string();
        self.amount_in = Amount::zero(decimals);
    }

    fn next_request_id(&mut self) -> u64 {
        self.next_request_id += 1;
        self.next_request_id
    }

    fn spawn_driver(&self, operation: Operation, request_id: u64, mut handle: TxHandle) {
        let sender = self.events_tx.clone();
        tokio::spawn(async move {
            loop {
                match handle.changed().await {
                    Some(state) => {
                        let terminal = state.status.is_terminal();
                        if sender
                            .send(ExchangeEvent::LifecycleUpdate {
                                operation,
                                request_id,
                                state,
                            })
                            .is_err()
                            || terminal
                        {
                            break;
                        }
                    }
                    None => {
                        let _ = sender.send(ExchangeEvent::LifecycleUpdate {
                            operation,
                            request_id,
                            state: TransactionState::failed(
                                "transaction handle dropped before settlement",
                            ),
                        });
                        break;
                    }
                }
            }
        });
    }

    /// Submit an unlimited approval to the router spender
    ///
    /// Unlimited rather than exact-amount approval is deliberate: it trades
    /// approval-scope minimality for a single approval across later swaps.
    pub async fn request_approve(&mut self) -> Result<(), Error> {
        if !self.eligibility().can_approve {
            return Err(Error::Ineligible(
                "approval is not available in the current state".to_string(),
            ));
        }
        let token = self.from_token.clone();
        let decimals = self.config.token_decimals(token.as_str());
        info!(token = %token, spender = %self.config.router_address, "requesting approval");

        let handle = self
            .provider
            .submit_approve(&token, &self.config.router_address, Amount::unlimited(decimals))
            .await?;

        let request_id = self.next_request_id();
        self.approval.begin(request_id, token, None);
        self.reset_flag = false;
        self.spawn_driver(Operation::Approve, request_id, handle);
        Ok(())
    }

    /// Submit the swap for the entered amount
    ///
    /// `amount_out_min` is always zero; quoting and slippage protection are
    /// out of scope. The deadline is delegated to the receiving contract.
    pub async fn request_swap(&mut self) -> Result<(), Error> {
        if !self.can_swap() {
            return Err(Error::Ineligible(
                "swap is not available in the current state".to_string(),
            ));
        }
        let from = self.from_token.clone();
        let to = self
            .to_token
            .clone()
            .ok_or_else(|| Error::Ineligible("no to-token selected".to_string()))?;
        let decimals = self.config.token_decimals(to.as_str());
        let deadline = Utc::now().timestamp() + self.config.deadline_window_secs as i64;
        info!(%from, %to, amount = %self.amount_in, deadline, "requesting swap");

        let handle = self
            .provider
            .submit_swap(
                self.amount_in,
                Amount::zero(decimals),
                vec![from.clone(), to.clone()],
                &self.account,
                deadline,
            )
            .await?;

        let request_id = self.next_request_id();
        self.swap.begin(request_id, from, Some(to));
        self.swap_requested = true;
        self.reset_flag = false;
        self.spawn_driver(Operation::Swap, request_id, handle);
        Ok(())
    }

    /// Derived eligibility from the current observations and in-flight flags
    pub fn eligibility(&self) -> Eligibility {
        Eligibility::evaluate(
            self.amount_in,
            self.balance_in,
            self.allowance,
            self.is_approving(),
            self.is_swapping(),
        )
    }

    pub fn needs_approval(&self) -> bool {
        self.eligibility().needs_approval
    }

    pub fn can_approve(&self) -> bool {
        self.eligibility().can_approve
    }

    /// Swap eligibility, additionally requiring a pool for the selected pair
    pub fn can_swap(&self) -> bool {
        self.eligibility().can_swap && self.pair().is_some()
    }

    pub fn is_approving(&self) -> bool {
        self.approval.lifecycle.is_pending()
    }

    pub fn is_swapping(&self) -> bool {
        self.swap.lifecycle.is_pending()
    }

    /// Which of the two mutually exclusive controls to present
    pub fn primary_action(&self) -> SwapAction {
        self.eligibility().primary_action()
    }

    pub fn blocking_reason(&self) -> Option<BlockingReason> {
        self.eligibility().blocking_reason()
    }

    /// The pool serving the current selection, if both tokens are chosen
    /// and a pool exists
    pub fn pair(&self) -> Option<&Pool> {
        let to = self.to_token.as_ref()?;
        pool::find_pool_by_tokens(&self.pools, &self.from_token, to)
    }

    /// All tokens offered for the from-side
    pub fn available_tokens(&self) -> Vec<TokenRef> {
        pool::available_tokens(&self.pools)
    }

    /// Tokens reachable from the current from-token
    pub fn counterpart_tokens(&self) -> Vec<TokenRef> {
        pool::counterpart_tokens(&self.pools, &self.from_token)
    }

    /// The terminal outcome currently on display, if any
    ///
    /// When both lifecycles are terminal, the approval outcome wins only
    /// while no swap has been requested in this cycle.
    fn outcome(&self) -> Option<(Operation, &TransactionState)> {
        let approval_done = self.approval.lifecycle.is_terminal();
        let swap_done = self.swap.lifecycle.is_terminal();
        match (approval_done, swap_done) {
            (true, true) => {
                if self.swap_requested {
                    Some((Operation::Swap, self.swap.lifecycle.state()))
                } else {
                    Some((Operation::Approve, self.approval.lifecycle.state()))
                }
            }
            (true, false) => Some((Operation::Approve, self.approval.lifecycle.state())),
            (false, true) => Some((Operation::Swap, self.swap.lifecycle.state())),
            (false, false) => None,
        }
    }

    pub fn success_message(&self) -> Option<String> {
        match self.outcome()? {
            (Operation::Approve, state) if state.status == TxStatus::Success => {
                Some("Token spending approved".to_string())
            }
            (Operation::Swap, state) if state.status == TxStatus::Success => {
                Some("Swap executed successfully".to_string())
            }
            _ => None,
        }
    }

    pub fn failure_message(&self) -> Option<String> {
        let (operation, state) = self.outcome()?;
        if state.status != TxStatus::Failed {
            return None;
        }
        let reason = state.error.as_deref().unwrap_or("unknown error");
        match operation {
            Operation::Approve => Some(format!("Approval failed: {}", reason)),
            Operation::Swap => Some(format!("Swap failed: {}", reason)),
        }
    }

    /// Raw entered value, always a previously accepted string
    pub fn from_value(&self) -> &str {
        &self.from_value
    }

    pub fn amount_in(&self) -> Amount {
        self.amount_in
    }

    pub fn from_token(&self) -> &TokenRef {
        &self.from_token
    }

    pub fn to_token(&self) -> Option<&TokenRef> {
        self.to_token.as_ref()
    }

    pub fn balance_in(&self) -> Option<Amount> {
        self.balance_in
    }

    pub fn allowance(&self) -> Option<Amount> {
        self.allowance
    }

    /// Whether the reset timer has cleared the form for a new cycle
    pub fn reset_flag(&self) -> bool {
        self.reset_flag
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn provider(&self) -> &Arc<dyn SwapProvider> {
        &self.provider
    }
}
