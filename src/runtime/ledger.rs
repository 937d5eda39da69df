//! Token balances, allowances and supplies for every asset in the host.

use std::collections::BTreeMap;

use tracing::trace;

use crate::domain::{Address, Amount};
use crate::error::{FlashError, Result};
use crate::math::CheckedArithmetic;

/// Multi-token ledger.
///
/// Tokens are identified by their [`Address`].  An allowance of
/// [`Amount::MAX`] is unlimited and is never decremented by
/// [`transfer_from`](Ledger::transfer_from).
///
/// # Examples
///
/// ```
/// use yieldspace_flash::domain::{Address, Amount};
/// use yieldspace_flash::runtime::Ledger;
///
/// let token = Address::repeat(0xba);
/// let alice = Address::repeat(1);
/// let bob = Address::repeat(2);
///
/// let mut ledger = Ledger::new();
/// assert!(ledger.mint(token, alice, Amount::new(100)).is_ok());
/// assert!(ledger.transfer(token, alice, bob, Amount::new(40)).is_ok());
/// assert_eq!(ledger.balance_of(token, bob), Amount::new(40));
/// assert_eq!(ledger.total_supply(token), Amount::new(100));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    supplies: BTreeMap<Address, Amount>,
    balances: BTreeMap<(Address, Address), Amount>,
    allowances: BTreeMap<(Address, Address, Address), Amount>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `holder` in `token`.
    pub fn balance_of(&self, token: Address, holder: Address) -> Amount {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Total supply of `token`.
    pub fn total_supply(&self, token: Address) -> Amount {
        self.supplies.get(&token).copied().unwrap_or(Amount::ZERO)
    }

    /// Amount `spender` may move out of `owner`'s `token` balance.
    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Sets the allowance of `spender` over `owner`'s `token` balance.
    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: Amount) {
        trace!(%token, %owner, %spender, %amount, "approve");
        self.allowances.insert((token, owner, spender), amount);
    }

    /// Creates `amount` new `token` units on `to`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::ArithmeticOverflow`] if the supply or the
    /// balance would overflow.
    pub fn mint(&mut self, token: Address, to: Address, amount: Amount) -> Result<()> {
        let supply = self.total_supply(token).safe_add(&amount)?;
        let balance = self.balance_of(token, to).safe_add(&amount)?;
        self.supplies.insert(token, supply);
        self.balances.insert((token, to), balance);
        trace!(%token, %to, %amount, "mint");
        Ok(())
    }

    /// Destroys `amount` `token` units held by `from`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InsufficientBalance`] if `from` holds less
    /// than `amount`.
    pub fn burn(&mut self, token: Address, from: Address, amount: Amount) -> Result<()> {
        let balance = self
            .balance_of(token, from)
            .checked_sub(&amount)
            .ok_or(FlashError::InsufficientBalance)?;
        let supply = self.total_supply(token).safe_sub(&amount)?;
        self.balances.insert((token, from), balance);
        self.supplies.insert(token, supply);
        trace!(%token, %from, %amount, "burn");
        Ok(())
    }

    /// Moves `amount` of `token` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InsufficientBalance`] if `from` holds less
    /// than `amount`.
    pub fn transfer(&mut self, token: Address, from: Address, to: Address, amount: Amount) -> Result<()> {
        let debited = self
            .balance_of(token, from)
            .checked_sub(&amount)
            .ok_or(FlashError::InsufficientBalance)?;
        self.balances.insert((token, from), debited);
        // Read after the debit so that a self-transfer is a no-op.
        let credited = self.balance_of(token, to).safe_add(&amount)?;
        self.balances.insert((token, to), credited);
        trace!(%token, %from, %to, %amount, "transfer");
        Ok(())
    }

    /// Moves `amount` of `token` from `from` to `to` on behalf of `spender`.
    ///
    /// A spender moving its own funds needs no allowance.
    ///
    /// # Errors
    ///
    /// - [`FlashError::InsufficientAllowance`] if the allowance is too low.
    /// - [`FlashError::InsufficientBalance`] if `from` holds less than
    ///   `amount`.
    pub fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        if spender != from {
            let allowed = self.allowance(token, from, spender);
            if allowed != Amount::MAX {
                let remaining = allowed
                    .checked_sub(&amount)
                    .ok_or(FlashError::InsufficientAllowance)?;
                self.allowances.insert((token, from, spender), remaining);
            }
        }
        self.transfer(token, from, to, amount)
    }
}
