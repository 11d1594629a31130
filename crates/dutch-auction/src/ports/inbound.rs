//! # Inbound Ports
//!
//! API trait defining what a Dutch auction instance can do.
//!
//! Mutating calls return `Err` with no state change on any failure. Views
//! read the time from the auction's clock.

use crate::domain::{AdminCap, Address, AuctionPhase, SettlementKind};
use crate::errors::AuctionError;
use crate::ports::outbound::AllowList;
use std::sync::Arc;

/// Dutch auction API - inbound port.
pub trait DutchAuctionApi: Send + Sync {
    // --- participants ----------------------------------------------------------

    /// Commits up to `amount` of the payment asset for `participant`.
    ///
    /// Returns the amount actually accepted after clamping, possibly zero.
    fn commit(&self, participant: Address, amount: u128) -> Result<u128, AuctionError>;

    /// Claims (success) or refunds (failure) for `participant`.
    ///
    /// Returns the amount paid out.
    fn withdraw(&self, participant: Address) -> Result<u128, AuctionError>;

    // --- lifecycle -------------------------------------------------------------

    /// Issues an administrator capability to `caller`.
    fn authorize(&self, caller: Address) -> Result<AdminCap, AuctionError>;

    /// Cancels an auction that has no commitments.
    fn cancel(&self, cap: &AdminCap) -> Result<(), AuctionError>;

    /// Finalizes the auction. `None` is a public call, allowed after the grace deadline.
    fn finalize(&self, cap: Option<&AdminCap>) -> Result<SettlementKind, AuctionError>;

    // --- administration --------------------------------------------------------

    /// Moves the schedule. Only before the first commitment.
    fn set_schedule(&self, cap: &AdminCap, start_time: u64, end_time: u64) -> Result<(), AuctionError>;

    /// Changes the price bounds. Only before the first commitment.
    fn set_prices(&self, cap: &AdminCap, start_price: u128, floor_price: u128) -> Result<(), AuctionError>;

    /// Changes the treasury.
    fn set_treasury(&self, cap: &AdminCap, treasury: Address) -> Result<(), AuctionError>;

    /// Hands the administrator role to `new_admin`, invalidating `cap`.
    fn transfer_administrator(&self, cap: &AdminCap, new_admin: Address) -> Result<(), AuctionError>;

    /// Installs an allow-list and enables it.
    fn set_allow_list(&self, cap: &AdminCap, list: Arc<dyn AllowList>) -> Result<(), AuctionError>;

    /// Toggles allow-list checks.
    fn enable_allow_list(&self, cap: &AdminCap, enabled: bool) -> Result<(), AuctionError>;

    // --- views -----------------------------------------------------------------

    /// Current clearing price.
    fn clearing_price(&self) -> u128;

    /// Current time-decayed price.
    fn decay_price(&self) -> u128;

    /// Current demand-implied price.
    fn demand_price(&self) -> u128;

    /// Price decrease per second.
    fn price_drop_rate(&self) -> u128;

    /// Commitments are currently accepted.
    fn is_open(&self) -> bool;

    /// Window over or auction already successful.
    fn has_ended(&self) -> bool;

    /// Demand meets the clearing price.
    fn auction_succeeded(&self) -> bool;

    /// Auctioned asset `participant` can claim now.
    fn claimable_amount(&self, participant: Address) -> u128;

    /// Sum of all accepted commitments.
    fn commitments_total(&self) -> u128;

    /// Commitment of `participant`.
    fn commitment_of(&self, participant: Address) -> u128;

    /// Auctioned asset already claimed by `participant`.
    fn claimed_of(&self, participant: Address) -> u128;

    /// Auctioned units bought at the current clearing price.
    fn tokens_committed(&self) -> u128;

    /// Current lifecycle phase.
    fn phase(&self) -> AuctionPhase;

    /// Terminal flag.
    fn is_finalized(&self) -> bool;

    /// Moment after which anyone may finalize.
    fn finalize_deadline(&self) -> u64;
}
