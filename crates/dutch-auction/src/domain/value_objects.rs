//! # Value Objects
//!
//! Immutable domain primitives for the auction.
//! These types represent concepts that are defined by their value, not identity.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// Re-export U256 from primitive-types for 256-bit intermediates
pub use primitive_types::U256;

// =============================================================================
// FIXED-POINT CONSTANTS
// =============================================================================

/// Fixed-point scale of every unit price (1e18).
pub const PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Decimal precision the auctioned asset must carry.
pub const REQUIRED_DECIMALS: u8 = 18;

/// Upper bound for a timestamp expressed in seconds.
///
/// Anything at or above this is almost certainly a millisecond value.
pub const MAX_TIMESTAMP_SECS: u64 = 10_000_000_000;

/// Default window after `end_time` after which anyone may finalize (7 days).
pub const DEFAULT_FINALIZE_GRACE_SECS: u64 = 7 * 24 * 3600;

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account identity (participant, administrator, treasury).
///
/// Serialized as a `0x`-prefixed hex string so it can key JSON maps.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address with every byte set to `byte`. Handy for fixtures.
    #[must_use]
    pub const fn repeat(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}...{}", hex::encode(&self.0[..4]), hex::encode(&self.0[18..]))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(self.0)))
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let digits = text.strip_prefix("0x").unwrap_or(&text);
        let bytes = hex::decode(digits).map_err(de::Error::custom)?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| de::Error::invalid_length(v.len(), &"20 bytes"))?;
        Ok(Self(bytes))
    }
}

// =============================================================================
// ASSET ID (20 bytes)
// =============================================================================

/// Identifier of a fungible asset handled by an [`AssetLedger`](crate::ports::AssetLedger).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AssetId(pub [u8; 20]);

impl AssetId {
    /// Creates an asset id from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId(0x{}...)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// =============================================================================
// WIDE ARITHMETIC
// =============================================================================

/// Computes `a * b / d` with a 256-bit intermediate, truncating.
///
/// Returns `None` when `d == 0` or the quotient does not fit in `u128`.
#[must_use]
pub fn mul_div(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    let quotient = U256::from(a) * U256::from(b) / U256::from(d);
    narrow(quotient)
}

/// Narrows a `U256` to `u128`, `None` if it does not fit.
#[must_use]
pub fn narrow(value: U256) -> Option<u128> {
    if value > U256::from(u128::MAX) {
        None
    } else {
        Some(value.low_u128())
    }
}
