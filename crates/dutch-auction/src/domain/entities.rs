//! # Core Domain Entities
//!
//! Configuration and mutable state of a single auction instance.

use crate::domain::value_objects::{Address, AssetId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// CONSTRUCTION PARAMETERS
// =============================================================================

/// Parameters supplied when deploying an auction.
///
/// Asset identifiers are not part of the parameters; they are read from the
/// ledger ports so the configuration can never disagree with custody.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionParams {
    /// Account that provides the auctioned supply at construction.
    pub funder: Address,
    /// Amount of auctioned asset for sale.
    pub total_supply: u128,
    /// Seconds since epoch at which commitments open.
    pub start_time: u64,
    /// Seconds since epoch after which commitments close.
    pub end_time: u64,
    /// Unit price at `start_time`, scaled by 1e18.
    pub start_price: u128,
    /// Unit price from `end_time` on, scaled by 1e18.
    pub floor_price: u128,
    /// Identity allowed to administer the auction.
    pub administrator: Address,
    /// Recipient of proceeds (success) or unsold supply (failure).
    pub treasury: Address,
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Immutable-after-first-commitment auction configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionConfig {
    /// Asset being sold.
    pub auctioned_asset: AssetId,
    /// Asset participants pay with.
    pub payment_asset: AssetId,
    /// Amount of auctioned asset for sale.
    pub total_supply: u128,
    /// Opening time (seconds).
    pub start_time: u64,
    /// Closing time (seconds).
    pub end_time: u64,
    /// Price at opening (1e18 scale).
    pub start_price: u128,
    /// Price floor (1e18 scale).
    pub floor_price: u128,
    /// Current administrator.
    pub administrator: Address,
    /// Current treasury.
    pub treasury: Address,
    /// Whether commitments are checked against the allow-list.
    pub allow_list_enabled: bool,
}

impl AuctionConfig {
    /// Builds a configuration from deployment parameters and ledger asset ids.
    #[must_use]
    pub fn from_params(params: &AuctionParams, auctioned: AssetId, payment: AssetId) -> Self {
        Self {
            auctioned_asset: auctioned,
            payment_asset: payment,
            total_supply: params.total_supply,
            start_time: params.start_time,
            end_time: params.end_time,
            start_price: params.start_price,
            floor_price: params.floor_price,
            administrator: params.administrator,
            treasury: params.treasury,
            allow_list_enabled: false,
        }
    }

    /// Length of the auction window in seconds.
    #[must_use]
    pub fn duration(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Mutable accounting state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionState {
    /// Terminal flag, set once.
    pub finalized: bool,
    /// Sum of all accepted commitments.
    pub commitments_total: u128,
    /// Cumulative commitment per participant.
    pub commitments: HashMap<Address, u128>,
    /// Cumulative auctioned asset claimed per participant.
    pub claimed: HashMap<Address, u128>,
    /// Branch taken at finalization, set together with `finalized`.
    #[serde(default)]
    pub outcome: Option<SettlementKind>,
}

impl AuctionState {
    /// Commitment recorded for `participant` (0 if none).
    #[must_use]
    pub fn commitment_of(&self, participant: &Address) -> u128 {
        self.commitments.get(participant).copied().unwrap_or(0)
    }

    /// Amount already claimed by `participant` (0 if none).
    #[must_use]
    pub fn claimed_of(&self, participant: &Address) -> u128 {
        self.claimed.get(participant).copied().unwrap_or(0)
    }

    /// Marks the auction finalized on the given branch.
    pub fn settle(&mut self, outcome: SettlementKind) {
        self.finalized = true;
        self.outcome = Some(outcome);
    }

    /// Number of participants with a commitment entry.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.commitments.len()
    }
}

// =============================================================================
// LIFECYCLE & OUTCOME
// =============================================================================

/// Lifecycle phase of an auction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionPhase {
    /// Before `start_time`.
    Pending,
    /// Inside `[start_time, end_time]`, not finalized.
    Open,
    /// After `end_time`, not finalized.
    Ended,
    /// Terminal.
    Finalized,
}

impl AuctionPhase {
    /// Check if terminal phase.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized)
    }
}

/// Which settlement branch a finalization takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementKind {
    /// Proceeds to treasury, participants claim the auctioned asset.
    Success,
    /// Supply back to treasury, participants are refunded.
    Failure,
}
