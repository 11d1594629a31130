//! # Domain Module
//!
//! Pure auction logic: price engine, commitment ledger, lifecycle rules and
//! settlement policies. Nothing here performs I/O or reads the clock.

pub mod authority;
pub mod commitments;
pub mod entities;
pub mod invariants;
pub mod lifecycle;
pub mod pricing;
pub mod settlement;
pub mod value_objects;

pub use authority::AdminCap;
pub use entities::*;
pub use invariants::{check_all_invariants, InvariantViolation};
pub use settlement::{FailureSettlement, LedgerSide, Payout, SettlementPolicy, SuccessSettlement};
pub use value_objects::*;
