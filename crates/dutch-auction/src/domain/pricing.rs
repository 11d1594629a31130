//! # Price Engine
//!
//! Pure, deterministic price functions. Time is always an explicit input.
//!
//! ```text
//! price
//!   ^
//! S |\
//!   |  \          clearing = max(decay, demand)
//!   |    \  ______________ demand
//!   |     /\
//! F |___/____\____________ decay
//!   +---------+-----------> time
//!   start     end
//! ```

use crate::domain::entities::{AuctionConfig, AuctionState};
use crate::domain::value_objects::{mul_div, PRICE_SCALE};

/// Linearly decayed price at `now`.
///
/// `start_price` up to and including `start_time`, `floor_price` from
/// `end_time` on, linear with truncating division in between.
#[must_use]
pub fn decay_price(config: &AuctionConfig, now: u64) -> u128 {
    if now <= config.start_time {
        return config.start_price;
    }
    if now >= config.end_time {
        return config.floor_price;
    }
    let elapsed = u128::from(now - config.start_time);
    let duration = u128::from(config.end_time - config.start_time);
    let spread = config.start_price.saturating_sub(config.floor_price);
    // elapsed < duration, so the drift is strictly below `spread` and fits.
    let drift = mul_div(elapsed, spread, duration).unwrap_or(spread);
    config.start_price - drift
}

/// Average price implied by the funds committed so far.
///
/// Zero while nothing is committed or if `total_supply` is zero. Saturates at
/// `u128::MAX`.
#[must_use]
pub fn demand_price(config: &AuctionConfig, state: &AuctionState) -> u128 {
    if config.total_supply == 0 {
        return 0;
    }
    mul_div(state.commitments_total, PRICE_SCALE, config.total_supply).unwrap_or(u128::MAX)
}

/// The higher of the demand price and the decayed price.
#[must_use]
pub fn clearing_price(config: &AuctionConfig, state: &AuctionState, now: u64) -> u128 {
    demand_price(config, state).max(decay_price(config, now))
}

/// Price decrease per second, truncated. Zero for a degenerate schedule.
#[must_use]
pub fn price_drop_rate(config: &AuctionConfig) -> u128 {
    let duration = u128::from(config.duration());
    config
        .start_price
        .saturating_sub(config.floor_price)
        .checked_div(duration)
        .unwrap_or(0)
}

/// True once demand alone meets the clearing price.
#[must_use]
pub fn auction_succeeded(config: &AuctionConfig, state: &AuctionState, now: u64) -> bool {
    demand_price(config, state) >= clearing_price(config, state, now)
}

/// Auctioned units the committed funds buy at the clearing price.
#[must_use]
pub fn tokens_committed(config: &AuctionConfig, state: &AuctionState, now: u64) -> u128 {
    let clearing = clearing_price(config, state, now);
    mul_div(state.commitments_total, PRICE_SCALE, clearing).unwrap_or(0)
}
