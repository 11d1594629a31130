//! End-to-end flows across the auction, its ledgers and the log pipeline.

pub mod concurrency;
pub mod flows;
