//! Borrower side of a flash loan.

use crate::domain::{Address, Amount};
use crate::error::Result;
use crate::runtime::Context;

/// A contract that receives a flash loan.
///
/// When [`on_flash_loan`](FlashBorrower::on_flash_loan) is invoked the
/// borrower already holds `amount` of `asset`.  Before returning it must
/// hand `amount + fee` back to the lender that called it; a borrower that
/// cannot should return an error, which aborts the whole operation.
pub trait FlashBorrower {
    /// The borrower's account.
    fn address(&self) -> Address;

    /// Uses the loan.
    ///
    /// `initiator` is the account that requested the loan, which need not
    /// be the borrower.  `lender` is the account to repay.
    ///
    /// # Errors
    ///
    /// Any error aborts the loan and rolls back every effect.
    #[allow(clippy::too_many_arguments)]
    fn on_flash_loan(
        &self,
        ctx: &mut Context,
        lender: Address,
        initiator: Address,
        asset: Address,
        amount: Amount,
        fee: Amount,
        data: &[u8],
    ) -> Result<()>;
}
