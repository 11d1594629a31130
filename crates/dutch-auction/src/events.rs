//! # Auction Events
//!
//! Notifications published to the [`EventSink`](crate::ports::EventSink)
//! after each accepted state transition.
//!
//! | Event | Emitted by |
//! |-------|------------|
//! | `AuctionDeployed` | construction |
//! | `CommitmentAdded` | `commit` (non-zero amount only) |
//! | `AuctionFinalized` | `finalize` |
//! | `AuctionCancelled` | `cancel` |
//! | `TokensClaimed` | `withdraw` on the success path |
//! | `CommitmentRefunded` | `withdraw` on the failure path (non-zero only) |
//! | `ScheduleUpdated`, `PricesUpdated`, `TreasuryUpdated`, `AdministratorTransferred`, `AllowListUpdated` | admin setters |

use crate::domain::entities::SettlementKind;
use crate::domain::value_objects::{Address, AssetId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event published by an auction instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionEvent {
    /// Auction created and funded.
    AuctionDeployed {
        /// Instance identifier.
        auction_id: Uuid,
        /// Asset being sold.
        auctioned_asset: AssetId,
        /// Asset participants pay with.
        payment_asset: AssetId,
        /// Supply pulled into custody.
        total_supply: u128,
        /// Opening time.
        start_time: u64,
        /// Closing time.
        end_time: u64,
    },
    /// Payment funds accepted.
    CommitmentAdded {
        /// Who committed.
        participant: Address,
        /// Amount after clamping.
        amount: u128,
    },
    /// Auction settled.
    AuctionFinalized {
        /// Branch taken.
        outcome: SettlementKind,
    },
    /// Auction cancelled before any commitment.
    AuctionCancelled,
    /// Auctioned asset paid out.
    TokensClaimed {
        /// Beneficiary.
        participant: Address,
        /// Amount paid.
        amount: u128,
    },
    /// Payment funds returned.
    CommitmentRefunded {
        /// Beneficiary.
        participant: Address,
        /// Amount refunded.
        amount: u128,
    },
    /// Schedule changed.
    ScheduleUpdated {
        /// New opening time.
        start_time: u64,
        /// New closing time.
        end_time: u64,
    },
    /// Price bounds changed.
    PricesUpdated {
        /// New start price.
        start_price: u128,
        /// New floor price.
        floor_price: u128,
    },
    /// Treasury changed.
    TreasuryUpdated {
        /// New treasury.
        treasury: Address,
    },
    /// Administrator handed over.
    AdministratorTransferred {
        /// Previous administrator.
        previous: Address,
        /// New administrator.
        new: Address,
    },
    /// Allow-list replaced or toggled.
    AllowListUpdated {
        /// Whether checks are active.
        enabled: bool,
    },
}

impl AuctionEvent {
    /// Short event name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AuctionDeployed { .. } => "auction_deployed",
            Self::CommitmentAdded { .. } => "commitment_added",
            Self::AuctionFinalized { .. } => "auction_finalized",
            Self::AuctionCancelled => "auction_cancelled",
            Self::TokensClaimed { .. } => "tokens_claimed",
            Self::CommitmentRefunded { .. } => "commitment_refunded",
            Self::ScheduleUpdated { .. } => "schedule_updated",
            Self::PricesUpdated { .. } => "prices_updated",
            Self::TreasuryUpdated { .. } => "treasury_updated",
            Self::AdministratorTransferred { .. } => "administrator_transferred",
            Self::AllowListUpdated { .. } => "allow_list_updated",
        }
    }
}
