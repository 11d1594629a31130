//! # Reentrancy Guard
//!
//! Scoped non-reentrant section around every mutating entry point.
//!
//! Mutating calls from different threads are serialized: a second caller
//! blocks until the first scope drops. Ledger ports may call back into the
//! auction while a transfer is in flight; such a nested call on the holding
//! thread fails fast with [`AuctionError::Reentrancy`] instead of deadlocking.

use crate::errors::AuctionError;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::cell::Cell;

/// Serializing, non-reentrant section owned by one auction instance.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    section: ReentrantMutex<Cell<bool>>,
}

impl ReentrancyGuard {
    /// Creates an unlocked guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters the guarded section.
    ///
    /// Blocks while another thread holds it. Fails if the calling thread
    /// already holds it. The section is released when the returned scope drops.
    pub fn enter(&self) -> Result<GuardScope<'_>, AuctionError> {
        let held = self.section.lock();
        if held.replace(true) {
            return Err(AuctionError::Reentrancy);
        }
        Ok(GuardScope { held })
    }

    /// True while some call holds the guard.
    #[must_use]
    pub fn is_entered(&self) -> bool {
        self.section.try_lock().map_or(true, |held| held.get())
    }
}

/// RAII scope of a held [`ReentrancyGuard`].
#[derive(Debug)]
pub struct GuardScope<'a> {
    held: ReentrantMutexGuard<'a, Cell<bool>>,
}

impl Drop for GuardScope<'_> {
    fn drop(&mut self) {
        self.held.set(false);
    }
}
