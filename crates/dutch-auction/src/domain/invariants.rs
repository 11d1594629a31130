//! # Domain Invariants
//!
//! Configuration rules checked at construction and in admin setters, plus the
//! accounting invariants that must hold between operations.

use crate::domain::entities::{AuctionConfig, AuctionParams, AuctionState};
use crate::domain::commitments;
use crate::domain::value_objects::{Address, U256, MAX_TIMESTAMP_SECS, PRICE_SCALE};
use crate::errors::AuctionError;

// =============================================================================
// CONFIGURATION RULES
// =============================================================================

/// Schedule must be in seconds, ordered, and not start in the past.
pub fn invariant_valid_schedule(start: u64, end: u64, now: u64) -> Result<(), AuctionError> {
    if start >= MAX_TIMESTAMP_SECS {
        return Err(AuctionError::TimestampNotSeconds(start));
    }
    if end >= MAX_TIMESTAMP_SECS {
        return Err(AuctionError::TimestampNotSeconds(end));
    }
    if start < now {
        return Err(AuctionError::StartInPast { start, now });
    }
    if start >= end {
        return Err(AuctionError::InvalidSchedule { start, end });
    }
    Ok(())
}

/// `start_price > floor_price > 0`.
pub fn invariant_valid_prices(start: u128, floor: u128) -> Result<(), AuctionError> {
    if floor == 0 {
        return Err(AuctionError::ZeroFloorPrice);
    }
    if start <= floor {
        return Err(AuctionError::InvalidPriceBounds { start, floor });
    }
    Ok(())
}

/// Identity must not be the zero address.
pub fn invariant_non_zero(address: Address, role: &'static str) -> Result<(), AuctionError> {
    if address.is_zero() {
        return Err(AuctionError::ZeroAddress(role));
    }
    Ok(())
}

/// Validates every deployment parameter.
pub fn validate_params(params: &AuctionParams, now: u64) -> Result<(), AuctionError> {
    if params.total_supply == 0 {
        return Err(AuctionError::ZeroTotalSupply);
    }
    invariant_valid_schedule(params.start_time, params.end_time, now)?;
    invariant_valid_prices(params.start_price, params.floor_price)?;
    invariant_non_zero(params.administrator, "administrator")?;
    invariant_non_zero(params.treasury, "treasury")?;
    invariant_non_zero(params.funder, "funder")?;
    Ok(())
}

/// Schedule and prices may only move before the first accepted commitment.
pub fn invariant_no_commitments(state: &AuctionState) -> Result<(), AuctionError> {
    if state.finalized {
        return Err(AuctionError::AlreadyFinalized);
    }
    if state.commitments_total != 0 {
        return Err(AuctionError::CommitmentsExist(state.commitments_total));
    }
    Ok(())
}

// =============================================================================
// ACCOUNTING INVARIANTS
// =============================================================================

/// Σ commitments[p] == commitments_total.
///
/// Holds before finalization; on the failure path refunds zero individual
/// entries while the total stays frozen.
#[must_use]
pub fn check_ledger_sum(state: &AuctionState) -> bool {
    let sum = state
        .commitments
        .values()
        .fold(U256::zero(), |acc, v| acc + U256::from(*v));
    sum == U256::from(state.commitments_total)
}

/// Admitting `amount` on top of `before` stays within capacity at `now`.
///
/// Capacity is taken against the state the commitment was planned on.
#[must_use]
pub fn check_admission(config: &AuctionConfig, before: &AuctionState, amount: u128, now: u64) -> bool {
    U256::from(before.commitments_total) + U256::from(amount) <= commitments::max_capacity(config, before, now)
}

/// commitments_total never exceeds capacity at the start price.
///
/// Admission is bounded by the decay price, which never rises above
/// `start_price` while commitments exist.
#[must_use]
pub fn check_capacity(config: &AuctionConfig, state: &AuctionState) -> bool {
    let ceiling = U256::from(config.total_supply) * U256::from(config.start_price) / U256::from(PRICE_SCALE);
    U256::from(state.commitments_total) <= ceiling
}

/// Every participant's claim stays within its pro-rata entitlement.
#[must_use]
pub fn check_claims_bounded(config: &AuctionConfig, state: &AuctionState) -> bool {
    state.claimed.iter().all(|(participant, claimed)| {
        let commitment = state.commitment_of(participant);
        if state.commitments_total == 0 {
            return *claimed == 0;
        }
        let entitlement = U256::from(commitment) * U256::from(config.total_supply)
            / U256::from(state.commitments_total);
        U256::from(*claimed) <= entitlement
    })
}

/// Specific accounting invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Per-participant commitments do not add up to the total.
    LedgerSumMismatch,
    /// Total committed exceeds capacity at the start price.
    CapacityExceeded,
    /// A participant claimed beyond entitlement.
    ClaimExceedsEntitlement,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LedgerSumMismatch => write!(f, "commitments do not sum to total"),
            Self::CapacityExceeded => write!(f, "commitments exceed capacity"),
            Self::ClaimExceedsEntitlement => write!(f, "claim exceeds entitlement"),
        }
    }
}

/// Checks every accounting invariant that applies to the current state.
#[must_use]
pub fn check_all_invariants(config: &AuctionConfig, state: &AuctionState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    if !state.finalized && !check_ledger_sum(state) {
        violations.push(InvariantViolation::LedgerSumMismatch);
    }
    if !check_capacity(config, state) {
        violations.push(InvariantViolation::CapacityExceeded);
    }
    if !check_claims_bounded(config, state) {
        violations.push(InvariantViolation::ClaimExceedsEntitlement);
    }
    violations
}
