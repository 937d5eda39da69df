//! Flash-mintable fyToken issuer and its callback seam.
//!
//! A [`CreditIssuer`] mints fyToken on credit: it creates the tokens on the
//! callback's account, hands control to the [`CreditCallback`], and once
//! the callback returns burns the same amount back.  The callback must
//! therefore hold the full amount again by the time it returns.

use crate::domain::{Address, Amount, Timestamp};
use crate::error::Result;
use crate::runtime::Context;

/// Receiver of fyToken minted on credit.
pub trait CreditCallback {
    /// Account that receives the minted tokens and is burned from after
    /// the callback.
    fn callback_address(&self) -> Address;

    /// Invoked by the issuer between mint and burn.
    ///
    /// `caller` is the account that invoked the callback; implementations
    /// must reject any caller other than the issuer they trust.
    ///
    /// # Errors
    ///
    /// Any error aborts the surrounding operation.
    fn on_credit_issued(
        &self,
        ctx: &mut Context,
        caller: Address,
        amount: Amount,
        bundle: &[u8],
    ) -> Result<()>;
}

/// A fyToken that can be flash-minted.
pub trait CreditIssuer {
    /// The token's own address.
    fn address(&self) -> Address;

    /// Time at which the token stops trading.
    fn maturity(&self) -> Timestamp;

    /// Largest supply the issuer accepts.
    fn supply_ceiling(&self) -> Amount;

    /// Outstanding supply.
    fn total_supply(&self, ctx: &Context) -> Amount {
        ctx.ledger().total_supply(self.address())
    }

    /// Mints `amount` to `callback`, runs it with `bundle`, then burns
    /// `amount` from it.
    ///
    /// # Errors
    ///
    /// - [`FlashError::SupplyCeilingExceeded`](crate::error::FlashError::SupplyCeilingExceeded)
    ///   if the mint would exceed [`CreditIssuer::supply_ceiling`].
    /// - [`FlashError::PastMaturity`](crate::error::FlashError::PastMaturity)
    ///   at or after maturity.
    /// - [`FlashError::InsufficientBalance`](crate::error::FlashError::InsufficientBalance)
    ///   if the callback no longer holds `amount` when it returns.
    /// - Any error raised by the callback.
    fn mint_on_credit(
        &self,
        ctx: &mut Context,
        callback: &dyn CreditCallback,
        amount: Amount,
        bundle: &[u8],
    ) -> Result<()>;
}
