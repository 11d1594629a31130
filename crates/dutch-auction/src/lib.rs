//! # Dutch Auction
//!
//! Descending-price token sale: a fixed supply is sold over a time window
//! while the unit price falls linearly from a start price to a floor.
//! Participants commit payment funds that convert into pro-rata claims.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Price Model
//!
//! | Price | Definition |
//! |-------|------------|
//! | decay | `start` at/before `start_time`, `floor` at/after `end_time`, linear in between |
//! | demand | `commitments_total * 1e18 / total_supply` |
//! | clearing | `max(decay, demand)` |
//!
//! The auction succeeds once `demand >= clearing`. Commitments are clamped so
//! the total never exceeds `total_supply * clearing / 1e18`.
//!
//! ## Lifecycle
//!
//! ```text
//! Pending -> Open -> Ended -> Finalized
//!    \________\___ cancel (no commitments) __/
//! ```
//!
//! Success sends proceeds to the treasury and lets participants claim.
//! Failure returns the supply to the treasury and refunds participants.
//!
//! ## Module Structure
//!
//! ```text
//! dutch-auction/
//! ├── domain/     # pricing, commitments, lifecycle, settlement, invariants
//! ├── ports/      # DutchAuctionApi, AssetLedger, Clock, EventSink, AllowList
//! ├── adapters/   # in-memory ledger, clocks, event sinks, allow-list
//! ├── service.rs  # DutchAuctionService
//! ├── events.rs   # AuctionEvent
//! ├── guard.rs    # reentrancy guard
//! └── errors.rs   # AuctionError, LedgerError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod guard;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{
    FanoutEventSink, InMemoryAllowList, InMemoryEventLog, InMemoryLedger, ManualClock, SystemClock,
    TracingEventSink,
};
pub use domain::{
    AdminCap, Address, AssetId, AuctionConfig, AuctionParams, AuctionPhase, AuctionState,
    FailureSettlement, InvariantViolation, LedgerSide, Payout, SettlementKind, SettlementPolicy,
    SuccessSettlement, PRICE_SCALE,
};
pub use errors::{AuctionError, ErrorCategory, LedgerError};
pub use events::AuctionEvent;
pub use ports::{AllowList, AssetLedger, Clock, DutchAuctionApi, EventSink};
pub use service::{AuctionPorts, AuctionStats, DutchAuctionService, ServiceConfig};

/// Everything needed to deploy and drive an auction.
pub mod prelude {
    pub use crate::adapters::{InMemoryAllowList, InMemoryEventLog, InMemoryLedger, ManualClock, SystemClock};
    pub use crate::domain::{AdminCap, Address, AssetId, AuctionParams, AuctionPhase, SettlementKind, PRICE_SCALE};
    pub use crate::errors::{AuctionError, LedgerError};
    pub use crate::events::AuctionEvent;
    pub use crate::ports::{AssetLedger, Clock, DutchAuctionApi, EventSink};
    pub use crate::service::{AuctionPorts, DutchAuctionService, ServiceConfig};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
