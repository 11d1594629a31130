//! # Settlement Router
//!
//! Terminal fund movement at finalization and the per-participant withdrawals
//! that follow it.
//!
//! | Branch  | At finalize                              | `withdraw(p)`                              |
//! |---------|------------------------------------------|--------------------------------------------|
//! | Success | `commitments_total` payment -> treasury  | pro-rata auctioned asset, adds to `claimed` |
//! | Failure | `total_supply` auctioned -> treasury     | refunds `commitments[p]`, zeroes the entry |
//!
//! Policies only plan and record. The service performs the transfer in between.

use crate::domain::commitments;
use crate::domain::entities::{AuctionConfig, AuctionState, SettlementKind};
use crate::domain::value_objects::Address;
use crate::errors::AuctionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two asset ledgers a transfer draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerSide {
    /// The auctioned asset.
    Auctioned,
    /// The payment asset.
    Payment,
}

/// A transfer out of custody.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    /// Ledger to draw from.
    pub side: LedgerSide,
    /// Recipient of the funds.
    pub recipient: Address,
    /// Amount, possibly zero.
    pub amount: u128,
}

impl Payout {
    /// True when nothing moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amount == 0
    }
}

/// Settlement strategy selected at finalization.
pub trait SettlementPolicy: Send + Sync + fmt::Debug {
    /// Branch this policy implements.
    fn kind(&self) -> SettlementKind;

    /// Ledger that withdrawals are paid from.
    fn withdrawal_side(&self) -> LedgerSide;

    /// The one-time transfer executed at finalize or cancel.
    fn terminal_payout(&self, config: &AuctionConfig, state: &AuctionState) -> Payout;

    /// Plans the withdrawal of `participant`.
    ///
    /// `custody_balance` is the custody held on [`withdrawal_side`](Self::withdrawal_side).
    fn plan_withdrawal(
        &self,
        config: &AuctionConfig,
        state: &AuctionState,
        participant: Address,
        custody_balance: u128,
    ) -> Result<Payout, AuctionError>;

    /// Records a withdrawal whose transfer has completed.
    fn apply_withdrawal(&self, state: &mut AuctionState, payout: &Payout) -> Result<(), AuctionError>;
}

// =============================================================================
// SUCCESS
// =============================================================================

/// Proceeds go to the treasury, participants claim the auctioned asset.
#[derive(Clone, Copy, Debug, Default)]
pub struct SuccessSettlement;

impl SettlementPolicy for SuccessSettlement {
    fn kind(&self) -> SettlementKind {
        SettlementKind::Success
    }

    fn withdrawal_side(&self) -> LedgerSide {
        LedgerSide::Auctioned
    }

    fn terminal_payout(&self, config: &AuctionConfig, state: &AuctionState) -> Payout {
        Payout {
            side: LedgerSide::Payment,
            recipient: config.treasury,
            amount: state.commitments_total,
        }
    }

    fn plan_withdrawal(
        &self,
        config: &AuctionConfig,
        state: &AuctionState,
        participant: Address,
        custody_balance: u128,
    ) -> Result<Payout, AuctionError> {
        let amount = commitments::claimable_amount(config, state, &participant, custody_balance);
        if amount == 0 {
            return Err(AuctionError::NothingToClaim(participant));
        }
        Ok(Payout {
            side: LedgerSide::Auctioned,
            recipient: participant,
            amount,
        })
    }

    fn apply_withdrawal(&self, state: &mut AuctionState, payout: &Payout) -> Result<(), AuctionError> {
        let claimed = state
            .claimed_of(&payout.recipient)
            .checked_add(payout.amount)
            .ok_or(AuctionError::ArithmeticOverflow("claimed"))?;
        state.claimed.insert(payout.recipient, claimed);
        Ok(())
    }
}

// =============================================================================
// FAILURE
// =============================================================================

/// Supply goes back to the treasury, participants are refunded.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailureSettlement;

impl SettlementPolicy for FailureSettlement {
    fn kind(&self) -> SettlementKind {
        SettlementKind::Failure
    }

    fn withdrawal_side(&self) -> LedgerSide {
        LedgerSide::Payment
    }

    fn terminal_payout(&self, config: &AuctionConfig, _state: &AuctionState) -> Payout {
        Payout {
            side: LedgerSide::Auctioned,
            recipient: config.treasury,
            amount: config.total_supply,
        }
    }

    fn plan_withdrawal(
        &self,
        _config: &AuctionConfig,
        state: &AuctionState,
        participant: Address,
        _custody_balance: u128,
    ) -> Result<Payout, AuctionError> {
        Ok(Payout {
            side: LedgerSide::Payment,
            recipient: participant,
            amount: state.commitment_of(&participant),
        })
    }

    fn apply_withdrawal(&self, state: &mut AuctionState, payout: &Payout) -> Result<(), AuctionError> {
        if let Some(entry) = state.commitments.get_mut(&payout.recipient) {
            *entry = 0;
        }
        Ok(())
    }
}
