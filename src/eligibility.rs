//! Swap eligibility evaluation
//!
//! Pure derivation of what the user may do next from the entered amount, the
//! observed balance and allowance, and the in-flight transaction flags. No
//! side effects; the orchestrator recomputes this on every relevant change.

use crate::amount::Amount;

/// The single actionable control to present
///
/// Approval and swap are mutually exclusive primary actions; representing
/// the selection as a tagged union keeps that invariant structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapAction {
    Approve,
    Swap,
}

/// Why the primary action is currently disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingReason {
    /// An approval transaction is already in flight
    ApprovalPending,
    /// A swap transaction is already in flight
    SwapPending,
    /// No amount entered
    ZeroAmount,
    /// Entered amount exceeds the available balance
    InsufficientBalance,
}

/// Derived eligibility for the approve/swap actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    /// Entered amount exceeds the current allowance
    pub needs_approval: bool,
    /// Entered amount is covered by the current balance
    pub has_sufficient_balance: bool,
    /// Entered amount is greater than zero
    pub is_positive_amount: bool,
    /// The approve action may be issued now
    pub can_approve: bool,
    /// The swap action may be issued now
    pub can_swap: bool,
    is_approving: bool,
    is_swapping: bool,
}

impl Eligibility {
    /// Evaluate eligibility from current observations
    ///
    /// An absent allowance or balance is treated as zero. For the allowance
    /// this conflates "not yet loaded" with "definitely zero"; the observed
    /// reference behavior does the same, so an unknown allowance simply
    /// shows the approve action.
    pub fn evaluate(
        amount_in: Amount,
        balance_in: Option<Amount>,
        allowance: Option<Amount>,
        is_approving: bool,
        is_swapping: bool,
    ) -> Self {
        let decimals = amount_in.decimals();
        let allowance = allowance.unwrap_or_else(|| Amount::zero(decimals));
        let balance_in = balance_in.unwrap_or_else(|| Amount::zero(decimals));

        let needs_approval = amount_in.gt(&allowance);
        let has_sufficient_balance = amount_in.lte(&balance_in);
        let is_positive_amount = !amount_in.is_zero();

        let can_approve = needs_approval && !is_approving && !is_swapping;
        let can_swap =
            !needs_approval && !is_swapping && is_positive_amount && has_sufficient_balance;

        Self {
            needs_approval,
            has_sufficient_balance,
            is_positive_amount,
            can_approve,
            can_swap,
            is_approving,
            is_swapping,
        }
    }

    /// Which of the two mutually exclusive controls to present
    ///
    /// While a swap is in flight the approval control is suppressed even if
    /// approval is technically needed, so the same allowance window cannot
    /// be double-submitted.
    pub fn primary_action(&self) -> SwapAction {
        if self.needs_approval && !self.is_swapping {
            SwapAction::Approve
        } else {
            SwapAction::Swap
        }
    }

    /// Why the primary action is disabled, if it is
    pub fn blocking_reason(&self) -> Option<BlockingReason> {
        match self.primary_action() {
            SwapAction::Approve => {
                if self.is_approving {
                    Some(BlockingReason::ApprovalPending)
                } else {
                    None
                }
            }
            SwapAction::Swap => {
                if self.is_swapping {
                    Some(BlockingReason::SwapPending)
                } else if !self.is_positive_amount {
                    Some(BlockingReason::ZeroAmount)
                } else if !self.has_sufficient_balance {
                    Some(BlockingReason::InsufficientBalance)
                } else {
                    None
                }
            }
        }
    }
}
