//! # Error Types
//!
//! All error types for the auction state machine and its collaborators.

use crate::domain::value_objects::{Address, AssetId};
use thiserror::Error;

// =============================================================================
// AUCTION ERRORS
// =============================================================================

/// Errors returned by every auction operation.
///
/// Each error is raised before any state change, so a failed call leaves the
/// auction exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuctionError {
    // --- configuration -------------------------------------------------------
    /// `start_time` must be strictly before `end_time`.
    #[error("invalid schedule: start {start} must be before end {end}")]
    InvalidSchedule { start: u64, end: u64 },

    /// Timestamp too large to be seconds since epoch.
    #[error("timestamp {0} is not expressed in seconds")]
    TimestampNotSeconds(u64),

    /// Start time lies in the past.
    #[error("start time {start} is in the past (now {now})")]
    StartInPast { start: u64, now: u64 },

    /// `start_price` must exceed `floor_price`.
    #[error("invalid price bounds: start {start} must exceed floor {floor}")]
    InvalidPriceBounds { start: u128, floor: u128 },

    /// Floor price of zero.
    #[error("floor price must be greater than zero")]
    ZeroFloorPrice,

    /// Auction with nothing to sell.
    #[error("total supply must be greater than zero")]
    ZeroTotalSupply,

    /// A required identity is the zero address.
    #[error("{0} must not be the zero address")]
    ZeroAddress(&'static str),

    /// Auctioned asset precision mismatch.
    #[error("auctioned asset has {actual} decimals, expected {expected}")]
    InvalidDecimals { expected: u8, actual: u8 },

    /// Payment and auctioned asset are the same.
    #[error("payment asset and auctioned asset are identical: {0}")]
    IdenticalAssets(AssetId),

    // --- authorization -------------------------------------------------------
    /// Caller is not the administrator.
    #[error("unauthorized: {0} is not the administrator")]
    Unauthorized(Address),

    /// Capability was issued by another auction or for a former administrator.
    #[error("stale or foreign administrator capability")]
    InvalidCapability,

    /// Non-administrator attempted to finalize before the grace deadline.
    #[error("finalize not permitted before {deadline} (now {now})")]
    FinalizeNotPermitted { now: u64, deadline: u64 },

    // --- lifecycle -----------------------------------------------------------
    /// Commitment before `start_time`.
    #[error("auction not started: now {now} < start {start}")]
    NotStarted { now: u64, start: u64 },

    /// Commitment after `end_time`.
    #[error("auction closed: now {now} > end {end}")]
    Closed { now: u64, end: u64 },

    /// Operation needs a non-finalized auction.
    #[error("auction already finalized")]
    AlreadyFinalized,

    /// Operation needs a finalized auction.
    #[error("auction not finalized")]
    NotFinalized,

    /// Failure path requested while the auction is still open.
    #[error("auction below reserve has not ended: now {now} <= end {end}")]
    AuctionNotEnded { now: u64, end: u64 },

    /// Schedule/price changes or cancel after funds were committed.
    #[error("funds already committed: {0}")]
    CommitmentsExist(u128),

    // --- value ---------------------------------------------------------------
    /// Nothing left to claim on the success path.
    #[error("nothing to claim for {0}")]
    NothingToClaim(Address),

    /// Participant rejected by the allow-list.
    #[error("{participant} is not allowed to commit {cumulative} in total")]
    NotAllowListed { participant: Address, cumulative: u128 },

    /// Counter width exceeded.
    #[error("arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    // --- concurrency ---------------------------------------------------------
    /// A ledger callback re-entered a mutating call on the same thread.
    #[error("reentrant call rejected")]
    Reentrancy,

    // --- collaborators -------------------------------------------------------
    /// Asset ledger rejected a transfer.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Coarse classification of [`AuctionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid parameters at construction or in an admin setter.
    Configuration,
    /// Caller lacks the required authority.
    Authorization,
    /// Operation is not legal in the current phase.
    Lifecycle,
    /// Operation would move nothing or too much.
    Value,
    /// Reentrancy guard tripped.
    Concurrency,
    /// External collaborator failed.
    Collaborator,
}

impl AuctionError {
    /// Returns the category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSchedule { .. }
            | Self::TimestampNotSeconds(_)
            | Self::StartInPast { .. }
            | Self::InvalidPriceBounds { .. }
            | Self::ZeroFloorPrice
            | Self::ZeroTotalSupply
            | Self::ZeroAddress(_)
            | Self::InvalidDecimals { .. }
            | Self::IdenticalAssets(_) => ErrorCategory::Configuration,
            Self::Unauthorized(_) | Self::InvalidCapability | Self::FinalizeNotPermitted { .. } => {
                ErrorCategory::Authorization
            }
            Self::NotStarted { .. }
            | Self::Closed { .. }
            | Self::AlreadyFinalized
            | Self::NotFinalized
            | Self::AuctionNotEnded { .. }
            | Self::CommitmentsExist(_) => ErrorCategory::Lifecycle,
            Self::NothingToClaim(_) | Self::NotAllowListed { .. } | Self::ArithmeticOverflow(_) => {
                ErrorCategory::Value
            }
            Self::Reentrancy => ErrorCategory::Concurrency,
            Self::Ledger(_) => ErrorCategory::Collaborator,
        }
    }

    /// Returns true if reissuing the same call later may succeed.
    ///
    /// Lifecycle errors clear as time passes (`NotStarted`, `AuctionNotEnded`,
    /// `NotFinalized`), as does the public finalize deadline. Terminal
    /// conditions such as `AlreadyFinalized` never clear.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NotStarted { .. }
                | Self::AuctionNotEnded { .. }
                | Self::NotFinalized
                | Self::FinalizeNotPermitted { .. }
                | Self::Reentrancy
                | Self::Ledger(_)
        )
    }
}

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors from an [`AssetLedger`](crate::ports::AssetLedger).
///
/// Ledgers fail atomically: an error means no balance moved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Owner balance too low.
    #[error("insufficient balance of {owner}: required {required}, available {available}")]
    InsufficientBalance {
        owner: Address,
        required: u128,
        available: u128,
    },

    /// Owner did not approve enough for the custody account.
    #[error("insufficient allowance from {owner}: required {required}, approved {approved}")]
    InsufficientAllowance {
        owner: Address,
        required: u128,
        approved: u128,
    },

    /// Custody holds less than the requested payout.
    #[error("insufficient custody balance: required {required}, available {available}")]
    InsufficientCustody { required: u128, available: u128 },

    /// Recipient balance would overflow.
    #[error("balance overflow for {0}")]
    BalanceOverflow(Address),

    /// Transfer refused for another reason.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

// =============================================================================
// TESTS
// =============================================================================
