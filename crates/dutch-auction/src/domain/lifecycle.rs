//! # Lifecycle Controller
//!
//! Derives the auction phase and decides which terminal transitions are legal.
//!
//! ```text
//! Pending --(start)--> Open --(end)--> Ended
//!    |                  |                |
//!    +-- cancel --------+                |
//!    |                  +-- finalize ----+--> Finalized
//! ```
//!
//! `cancel` needs zero commitments. `finalize` needs the administrator, or
//! anyone once the grace deadline has passed.

use crate::domain::entities::{AuctionConfig, AuctionPhase, AuctionState, SettlementKind};
use crate::domain::pricing;
use crate::errors::AuctionError;

/// Current lifecycle phase.
#[must_use]
pub fn phase(config: &AuctionConfig, state: &AuctionState, now: u64) -> AuctionPhase {
    if state.finalized {
        AuctionPhase::Finalized
    } else if now < config.start_time {
        AuctionPhase::Pending
    } else if now <= config.end_time {
        AuctionPhase::Open
    } else {
        AuctionPhase::Ended
    }
}

/// Inside the commitment window and not finalized.
#[must_use]
pub fn is_open(config: &AuctionConfig, state: &AuctionState, now: u64) -> bool {
    phase(config, state, now) == AuctionPhase::Open
}

/// Past `end_time`, or already successful.
#[must_use]
pub fn has_ended(config: &AuctionConfig, state: &AuctionState, now: u64) -> bool {
    pricing::auction_succeeded(config, state, now) || now > config.end_time
}

/// Moment after which anyone may finalize.
#[must_use]
pub fn finalize_deadline(config: &AuctionConfig, grace_secs: u64) -> u64 {
    config.end_time.saturating_add(grace_secs)
}

/// Decides the settlement branch of a `finalize` call.
///
/// `is_admin` is whether the caller presented a valid administrator
/// capability.
pub fn decide_finalize(
    config: &AuctionConfig,
    state: &AuctionState,
    now: u64,
    is_admin: bool,
    grace_secs: u64,
) -> Result<SettlementKind, AuctionError> {
    if state.finalized {
        return Err(AuctionError::AlreadyFinalized);
    }
    let deadline = finalize_deadline(config, grace_secs);
    if !is_admin && now <= deadline {
        return Err(AuctionError::FinalizeNotPermitted { now, deadline });
    }
    if config.total_supply == 0 {
        return Err(AuctionError::ZeroTotalSupply);
    }
    if pricing::auction_succeeded(config, state, now) {
        return Ok(SettlementKind::Success);
    }
    if now <= config.end_time {
        return Err(AuctionError::AuctionNotEnded {
            now,
            end: config.end_time,
        });
    }
    Ok(SettlementKind::Failure)
}

/// Decides a `cancel` call. Cancellation always takes the failure branch.
pub fn decide_cancel(state: &AuctionState) -> Result<SettlementKind, AuctionError> {
    if state.finalized {
        return Err(AuctionError::AlreadyFinalized);
    }
    if state.commitments_total != 0 {
        return Err(AuctionError::CommitmentsExist(state.commitments_total));
    }
    Ok(SettlementKind::Failure)
}

/// Branch a finalized auction settled on.
pub fn settled_kind(state: &AuctionState) -> Result<SettlementKind, AuctionError> {
    match (state.finalized, state.outcome) {
        (true, Some(kind)) => Ok(kind),
        _ => Err(AuctionError::NotFinalized),
    }
}
