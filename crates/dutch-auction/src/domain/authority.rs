//! # Administrator Capability
//!
//! Admin operations take an [`AdminCap`] instead of a raw caller identity.
//! A capability is bound to one auction and one administrator; it stops
//! working once the administrator changes.

use crate::domain::value_objects::Address;
use uuid::Uuid;

/// Proof that `holder` was the administrator of auction `auction_id` when issued.
///
/// Only the issuing service can construct one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminCap {
    holder: Address,
    auction_id: Uuid,
}

impl AdminCap {
    pub(crate) fn issue(holder: Address, auction_id: Uuid) -> Self {
        Self { holder, auction_id }
    }

    /// Identity the capability was issued to.
    #[must_use]
    pub fn holder(&self) -> Address {
        self.holder
    }

    /// Auction that issued the capability.
    #[must_use]
    pub fn auction_id(&self) -> Uuid {
        self.auction_id
    }

    /// True if the capability still grants authority over `auction_id`.
    #[must_use]
    pub fn grants(&self, auction_id: Uuid, administrator: Address) -> bool {
        self.auction_id == auction_id && self.holder == administrator
    }
}
