//! In-memory allow-list.

use crate::domain::Address;
use crate::ports::outbound::AllowList;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Per-participant commitment caps.
///
/// Unlisted participants are rejected. A cap of `u128::MAX` admits any amount.
#[derive(Debug, Default)]
pub struct InMemoryAllowList {
    caps: RwLock<HashMap<Address, u128>>,
}

impl InMemoryAllowList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `participant` up to `cap` in cumulative commitments.
    pub fn allow(&self, participant: Address, cap: u128) {
        self.caps.write().insert(participant, cap);
    }

    /// Allow `participant` without a cap.
    pub fn allow_unlimited(&self, participant: Address) {
        self.allow(participant, u128::MAX);
    }

    /// Remove `participant`.
    pub fn revoke(&self, participant: Address) {
        self.caps.write().remove(&participant);
    }
}

impl AllowList for InMemoryAllowList {
    fn is_allowed(&self, participant: Address, cumulative: u128) -> bool {
        self.caps
            .read()
            .get(&participant)
            .is_some_and(|cap| cumulative <= *cap)
    }
}
