//! # Outbound Ports
//!
//! Collaborators the auction drives: asset custody, time, event publication
//! and the optional allow-list.
//!
//! All ports are synchronous. A ledger may call back into the auction while a
//! transfer is in flight; mutating re-entry is rejected by the service.

use crate::domain::value_objects::{Address, AssetId};
use crate::errors::LedgerError;
use crate::events::AuctionEvent;

/// Fungible asset ledger holding the auction's custody.
///
/// Every method acts on behalf of the auction's custody account. Failures are
/// atomic: on `Err` no balance moved.
pub trait AssetLedger: Send + Sync {
    /// Identifier of the asset this ledger tracks.
    fn asset_id(&self) -> AssetId;

    /// Decimal precision of the asset.
    fn decimals(&self) -> u8;

    /// Pulls `amount` from `owner` into custody, consuming allowance.
    fn transfer_from(&self, owner: Address, amount: u128) -> Result<(), LedgerError>;

    /// Pays `amount` out of custody to `recipient`.
    fn transfer(&self, recipient: Address, amount: u128) -> Result<(), LedgerError>;

    /// Amount currently held in custody.
    fn custody_balance(&self) -> u128;
}

/// Source of the current time in seconds since epoch.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> u64;
}

/// Receiver of auction events.
pub trait EventSink: Send + Sync {
    /// Publishes one event. Must not fail.
    fn publish(&self, event: &AuctionEvent);
}

/// Participation policy consulted on each commitment when enabled.
pub trait AllowList: Send + Sync {
    /// True if `participant` may hold `cumulative` in total commitments.
    fn is_allowed(&self, participant: Address, cumulative: u128) -> bool;
}
