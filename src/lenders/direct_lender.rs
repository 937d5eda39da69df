//! Zero-fee flash lender of the fyToken itself.
//!
//! The issuer mints straight to the borrower, the borrower's callback runs,
//! and the issuer burns the same amount back from the borrower.  There is
//! no pricing and no trade, so the fee is always zero.

use core::cell::Cell;

use tracing::{debug, warn};

use super::guard::{advance, LoanGuard};
use crate::domain::{Address, Amount, LoanContext, LoanState};
use crate::error::{FlashError, Result};
use crate::runtime::Context;
use crate::traits::{CreditCallback, CreditIssuer, FlashBorrower, FlashLender};

/// Flash lender of a fyToken, backed only by the issuer's mint-on-credit.
///
/// Repayment is the issuer's burn: the borrower must still hold `amount`
/// fyToken when its callback returns.
#[derive(Debug)]
pub struct DirectFlashLender<T> {
    address: Address,
    issuer: T,
    state: Cell<LoanState>,
}

impl<T: CreditIssuer> DirectFlashLender<T> {
    /// Creates a lender at `address` lending `issuer`'s token.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] if `address` is zero or
    /// equals the issuer's address.
    pub fn new(address: Address, issuer: T) -> Result<Self> {
        if address.is_zero() || address == issuer.address() {
            return Err(FlashError::InvalidConfiguration("lender address must be its own"));
        }
        Ok(Self {
            address,
            issuer,
            state: Cell::new(LoanState::Idle),
        })
    }

    /// The lender's own account.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The issuer whose token is lent.
    #[must_use]
    pub const fn issuer(&self) -> &T {
        &self.issuer
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn state(&self) -> LoanState {
        self.state.get()
    }

    /// Issuer callback: hands control to the borrower.
    ///
    /// # Errors
    ///
    /// - [`FlashError::UnauthorizedCaller`] unless `caller` is the issuer,
    ///   or if the bundle names a different receiver.
    /// - [`FlashError::CallbackOutOfSequence`] outside a loan.
    /// - [`FlashError::MalformedBundle`] if `bundle` cannot be decoded or
    ///   disagrees with `amount`.
    /// - Any borrower error.
    pub fn on_credit_issued(
        &self,
        ctx: &mut Context,
        receiver: &dyn FlashBorrower,
        caller: Address,
        amount: Amount,
        bundle: &[u8],
    ) -> Result<()> {
        if caller != self.issuer.address() {
            return Err(FlashError::UnauthorizedCaller);
        }
        if self.state.get() != LoanState::Issuing {
            return Err(FlashError::CallbackOutOfSequence);
        }
        let loan = LoanContext::decode(bundle)?;
        if loan.receiver() != receiver.address() {
            return Err(FlashError::UnauthorizedCaller);
        }
        if loan.amount() != amount {
            return Err(FlashError::MalformedBundle);
        }

        advance(&self.state, LoanState::BorrowerExecuting);
        receiver.on_flash_loan(
            ctx,
            self.address,
            loan.initiator(),
            self.issuer.address(),
            amount,
            Amount::ZERO,
            loan.data(),
        )
    }
}

impl<T: CreditIssuer> FlashLender for DirectFlashLender<T> {
    fn flash_supply(&self, ctx: &Context, asset: Address) -> Amount {
        if asset != self.issuer.address() {
            return Amount::ZERO;
        }
        self.issuer
            .supply_ceiling()
            .saturating_sub(&self.issuer.total_supply(ctx))
    }

    fn flash_fee(&self, _ctx: &Context, asset: Address, _amount: Amount) -> Result<Amount> {
        if asset != self.issuer.address() {
            return Err(FlashError::UnsupportedAsset);
        }
        Ok(Amount::ZERO)
    }

    fn flash_loan(
        &self,
        ctx: &mut Context,
        caller: Address,
        receiver: &dyn FlashBorrower,
        asset: Address,
        amount: Amount,
        data: &[u8],
    ) -> Result<()> {
        let _guard = LoanGuard::enter(&self.state, LoanState::Issuing)?;
        if asset != self.issuer.address() {
            return Err(FlashError::UnsupportedAsset);
        }
        if amount.is_zero() {
            return Err(FlashError::InvalidQuantity("loan amount must be non-zero"));
        }
        let bundle = LoanContext::new(caller, receiver.address(), amount, data.to_vec()).encode()?;
        let frame = DirectFrame {
            lender: self,
            receiver,
        };
        self.issuer
            .mint_on_credit(ctx, &frame, amount, &bundle)
            .map_err(|err| {
                warn!(error = %err, %amount, "direct flash loan aborted");
                err
            })?;
        debug!(%caller, receiver = %receiver.address(), %amount, "direct flash loan settled");
        Ok(())
    }
}

/// Issuer callback target: credit lands on the receiver, the callback is
/// routed through the lender.
struct DirectFrame<'a, T> {
    lender: &'a DirectFlashLender<T>,
    receiver: &'a dyn FlashBorrower,
}

impl<T: CreditIssuer> CreditCallback for DirectFrame<'_, T> {
    fn callback_address(&self) -> Address {
        self.receiver.address()
    }

    fn on_credit_issued(
        &self,
        ctx: &mut Context,
        caller: Address,
        amount: Amount,
        bundle: &[u8],
    ) -> Result<()> {
        self.lender
            .on_credit_issued(ctx, self.receiver, caller, amount, bundle)
    }
}
