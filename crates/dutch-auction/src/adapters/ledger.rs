//! In-memory Asset Ledger
//!
//! Implements the `AssetLedger` port with balances, custody allowances and a
//! custody account, all behind one lock so every transfer is atomic.

use crate::domain::value_objects::{Address, AssetId};
use crate::errors::LedgerError;
use crate::ports::outbound::AssetLedger;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Default)]
struct Book {
    balances: HashMap<Address, u128>,
    allowances: HashMap<Address, u128>,
    custody: u128,
    frozen: HashSet<Address>,
}

impl Book {
    fn balance(&self, owner: &Address) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn ensure_active(&self, account: &Address) -> Result<(), LedgerError> {
        if self.frozen.contains(account) {
            return Err(LedgerError::Rejected(format!("account {account} is frozen")));
        }
        Ok(())
    }
}

/// In-memory fungible ledger for one asset.
///
/// Participants `approve` the auction custody before committing, the same way
/// an allowance-based token works.
#[derive(Debug)]
pub struct InMemoryLedger {
    asset: AssetId,
    decimals: u8,
    book: RwLock<Book>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new(asset: AssetId, decimals: u8) -> Self {
        Self {
            asset,
            decimals,
            book: RwLock::new(Book::default()),
        }
    }

    /// Credit `owner` with newly created units.
    pub fn mint(&self, owner: Address, amount: u128) -> Result<(), LedgerError> {
        let mut book = self.book.write();
        let balance = book
            .balance(&owner)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(owner))?;
        book.balances.insert(owner, balance);
        Ok(())
    }

    /// Set the amount custody may pull from `owner`.
    pub fn approve(&self, owner: Address, amount: u128) {
        self.book.write().allowances.insert(owner, amount);
    }

    /// Balance of `owner` outside custody.
    #[must_use]
    pub fn balance_of(&self, owner: Address) -> u128 {
        self.book.read().balance(&owner)
    }

    /// Remaining custody allowance granted by `owner`.
    #[must_use]
    pub fn allowance(&self, owner: Address) -> u128 {
        self.book.read().allowances.get(&owner).copied().unwrap_or(0)
    }

    /// Freeze or unfreeze an account. Transfers touching a frozen account fail.
    pub fn set_frozen(&self, account: Address, frozen: bool) {
        let mut book = self.book.write();
        if frozen {
            book.frozen.insert(account);
        } else {
            book.frozen.remove(&account);
        }
    }

    /// Total units across balances and custody.
    #[must_use]
    pub fn total_issued(&self) -> u128 {
        let book = self.book.read();
        book.balances
            .values()
            .fold(book.custody, |acc, v| acc.saturating_add(*v))
    }
}

impl AssetLedger for InMemoryLedger {
    fn asset_id(&self) -> AssetId {
        self.asset
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn transfer_from(&self, owner: Address, amount: u128) -> Result<(), LedgerError> {
        let mut book = self.book.write();
        book.ensure_active(&owner)?;
        let approved = book.allowances.get(&owner).copied().unwrap_or(0);
        if approved < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner,
                required: amount,
                approved,
            });
        }
        let available = book.balance(&owner);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                owner,
                required: amount,
                available,
            });
        }
        let custody = book
            .custody
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(owner))?;
        book.allowances.insert(owner, approved - amount);
        book.balances.insert(owner, available - amount);
        book.custody = custody;
        debug!(asset = %self.asset, %owner, amount, "pulled into custody");
        Ok(())
    }

    fn transfer(&self, recipient: Address, amount: u128) -> Result<(), LedgerError> {
        let mut book = self.book.write();
        book.ensure_active(&recipient)?;
        if book.custody < amount {
            return Err(LedgerError::InsufficientCustody {
                required: amount,
                available: book.custody,
            });
        }
        let balance = book
            .balance(&recipient)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(recipient))?;
        book.custody -= amount;
        book.balances.insert(recipient, balance);
        debug!(asset = %self.asset, %recipient, amount, "paid out of custody");
        Ok(())
    }

    fn custody_balance(&self) -> u128 {
        self.book.read().custody
    }
}
