//! # Commitment Ledger
//!
//! Admission control and accounting for committed payment funds.
//!
//! Commitments use fill-or-clamp admission: a request larger than the
//! remaining capacity is cut down to exactly fill it, never rejected.

use crate::domain::entities::{AuctionConfig, AuctionState};
use crate::domain::pricing;
use crate::domain::value_objects::{mul_div, narrow, Address, U256, PRICE_SCALE};
use crate::errors::AuctionError;

/// Auction value capacity at the clearing price, in payment units.
#[must_use]
pub fn max_capacity(config: &AuctionConfig, state: &AuctionState, now: u64) -> U256 {
    let clearing = pricing::clearing_price(config, state, now);
    U256::from(config.total_supply) * U256::from(clearing) / U256::from(PRICE_SCALE)
}

/// Clamps `requested` to the capacity left at `now`. May return zero.
#[must_use]
pub fn clamp_commitment(config: &AuctionConfig, state: &AuctionState, requested: u128, now: u64) -> u128 {
    let capacity = max_capacity(config, state, now);
    let total = U256::from(state.commitments_total);
    if total + U256::from(requested) > capacity {
        // remaining < requested here, so it fits in u128
        let remaining = capacity.saturating_sub(total);
        narrow(remaining).unwrap_or(requested)
    } else {
        requested
    }
}

/// Checks that a commitment may be taken at `now`.
pub fn ensure_commit_window(config: &AuctionConfig, state: &AuctionState, now: u64) -> Result<(), AuctionError> {
    if state.finalized {
        return Err(AuctionError::AlreadyFinalized);
    }
    if now < config.start_time {
        return Err(AuctionError::NotStarted {
            now,
            start: config.start_time,
        });
    }
    if now > config.end_time {
        return Err(AuctionError::Closed {
            now,
            end: config.end_time,
        });
    }
    Ok(())
}

/// A validated, clamped commitment ready to be funded and recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitmentPlan {
    /// Who commits.
    pub participant: Address,
    /// Amount originally requested.
    pub requested: u128,
    /// Amount admitted after clamping.
    pub amount: u128,
    /// Participant's cumulative commitment once recorded.
    pub cumulative: u128,
}

impl CommitmentPlan {
    /// True when the request was cut down.
    #[must_use]
    pub fn was_clamped(&self) -> bool {
        self.amount < self.requested
    }

    /// True when nothing will be recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amount == 0
    }
}

/// Validates the window, clamps, and checks counter widths.
///
/// Pure: the caller moves funds and then calls [`apply_commitment`].
pub fn plan_commitment(
    config: &AuctionConfig,
    state: &AuctionState,
    participant: Address,
    requested: u128,
    now: u64,
) -> Result<CommitmentPlan, AuctionError> {
    ensure_commit_window(config, state, now)?;
    let amount = clamp_commitment(config, state, requested, now);
    let current = state.commitment_of(&participant);
    if amount > 0 {
        state
            .commitments_total
            .checked_add(amount)
            .ok_or(AuctionError::ArithmeticOverflow("commitments_total"))?;
    }
    let cumulative = current
        .checked_add(amount)
        .ok_or(AuctionError::ArithmeticOverflow("commitment"))?;
    Ok(CommitmentPlan {
        participant,
        requested,
        amount,
        cumulative,
    })
}

/// Records a funded commitment.
pub fn apply_commitment(state: &mut AuctionState, plan: &CommitmentPlan) -> Result<(), AuctionError> {
    if plan.is_empty() {
        return Ok(());
    }
    let total = state
        .commitments_total
        .checked_add(plan.amount)
        .ok_or(AuctionError::ArithmeticOverflow("commitments_total"))?;
    let entry = state.commitments.entry(plan.participant).or_insert(0);
    *entry = entry
        .checked_add(plan.amount)
        .ok_or(AuctionError::ArithmeticOverflow("commitment"))?;
    state.commitments_total = total;
    Ok(())
}

/// Pro-rata entitlement of `participant` not yet claimed, before custody clamping.
#[must_use]
pub fn unclaimed_entitlement(config: &AuctionConfig, state: &AuctionState, participant: &Address) -> u128 {
    let commitment = state.commitment_of(participant);
    if commitment == 0 {
        return 0;
    }
    let entitlement = mul_div(commitment, config.total_supply, state.commitments_total).unwrap_or(0);
    entitlement.saturating_sub(state.claimed_of(participant))
}

/// Auctioned asset `participant` can claim now, never more than custody holds.
#[must_use]
pub fn claimable_amount(
    config: &AuctionConfig,
    state: &AuctionState,
    participant: &Address,
    custody_balance: u128,
) -> u128 {
    unclaimed_entitlement(config, state, participant).min(custody_balance)
}
