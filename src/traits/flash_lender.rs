//! Lender side of a flash loan.

use super::FlashBorrower;
use crate::domain::{Address, Amount};
use crate::error::Result;
use crate::runtime::Context;

/// Common interface of every flash lender in this crate.
///
/// # Implementors
///
/// - `PoolFlashLender`: lends a pool's base asset, fee set by the curve
/// - `DirectFlashLender`: lends fyToken itself, free of charge
pub trait FlashLender {
    /// Largest amount of `asset` that can currently be borrowed; zero for
    /// unsupported assets.
    fn flash_supply(&self, ctx: &Context, asset: Address) -> Amount;

    /// Fee charged for borrowing `amount` of `asset` right now.
    ///
    /// # Errors
    ///
    /// [`FlashError::UnsupportedAsset`](crate::error::FlashError::UnsupportedAsset)
    /// if `asset` cannot be borrowed, or pricing errors.
    fn flash_fee(&self, ctx: &Context, asset: Address, amount: Amount) -> Result<Amount>;

    /// Lends `amount` of `asset` to `receiver`, invoking its
    /// [`FlashBorrower::on_flash_loan`] with `data`, and collects
    /// `amount + fee` before returning.
    ///
    /// # Errors
    ///
    /// Any error means nothing happened once the host rolls back.
    fn flash_loan(
        &self,
        ctx: &mut Context,
        caller: Address,
        receiver: &dyn FlashBorrower,
        asset: Address,
        amount: Amount,
        data: &[u8],
    ) -> Result<()>;
}
