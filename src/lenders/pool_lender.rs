//! Flash lender backed by a YieldSpace pool.
//!
//! The lender owns no base asset.  To lend `amount` it flash-mints the
//! fyToken needed to buy `amount` base from the pool, hands the base to the
//! borrower, takes back `amount + fee`, buys the same fyToken back and lets
//! the issuer burn it.  The fee is whatever the round trip through the pool
//! costs.
//!
//! # Loan Algorithm
//!
//! 1. `Quoting`: `yield_amount = pool.preview_buy_base_asset(amount)`
//! 2. `Issuing`: `issuer.mint_on_credit(yield_amount, bundle)` calls back
//! 3. `Converting`: `pool.buy_base_asset(amount)` paid with the fresh fyToken
//! 4. `BorrowerExecuting`: send `amount`, call `on_flash_loan`, expect
//!    `amount + fee` back
//! 5. `Repaying`: `pool.buy_yield_token(yield_amount)` for at most
//!    `amount + fee`
//! 6. the issuer burns `yield_amount` from the lender
//!
//! # Fee Quote
//!
//! [`FlashLender::flash_fee`] prices step 5 on the reserves step 3 would
//! leave behind: `(B - amount, Y + yield_amount)`, reserve guard included.
//! The enforced fee is recomputed against the live reserves after step 3,
//! which are exactly those, so quote and enforcement agree to the unit and
//! refuse the same loans.  This holds up to and including
//! [`FlashLender::flash_supply`], where step 3 empties the base reserve.

use core::cell::{Cell, RefCell};

use tracing::{debug, warn};

use super::guard::{advance, LoanGuard};
use crate::config::{CurveParams, LenderConfig};
use crate::domain::{Address, Amount, LoanContext, LoanState};
use crate::error::{FlashError, Result};
use crate::math::CheckedArithmetic;
use crate::runtime::Context;
use crate::traits::{
    quote_buy_yield_token, CreditCallback, CreditIssuer, FlashBorrower, FlashLender, YieldPool,
};

/// Flash lender of a pool's base asset.
///
/// All entry points take `&self`: the lifecycle tag lives in a [`Cell`] and
/// the pool binding in a [`RefCell`], so the lender can be shared (e.g.
/// through `Rc`) with a borrower that tries to re-enter it.
#[derive(Debug)]
pub struct PoolFlashLender<P> {
    config: LenderConfig,
    curve: CurveParams,
    pool: RefCell<Option<P>>,
    state: Cell<LoanState>,
}

impl<P: YieldPool> PoolFlashLender<P> {
    /// Creates an unbound lender.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] if `config` is invalid.
    pub fn new(config: LenderConfig) -> Result<Self> {
        config.validate()?;
        let curve = config.curve().params()?;
        Ok(Self {
            config,
            curve,
            pool: RefCell::new(None),
            state: Cell::new(LoanState::Idle),
        })
    }

    /// Creates a lender already bound to `pool`, approving it as
    /// [`set_collateral_pool`](Self::set_collateral_pool) does.
    ///
    /// # Errors
    ///
    /// As [`PoolFlashLender::new`] and
    /// [`PoolFlashLender::set_collateral_pool`].
    pub fn with_pool(config: LenderConfig, ctx: &mut Context, pool: P) -> Result<Self> {
        let lender = Self::new(config)?;
        lender.set_collateral_pool(ctx, config.owner(), pool)?;
        Ok(lender)
    }

    /// The lender's own account.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.config.address()
    }

    /// The account allowed to rebind the pool.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.config.owner()
    }

    /// The curve the lender quotes with.
    #[must_use]
    pub const fn curve(&self) -> CurveParams {
        self.curve
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn state(&self) -> LoanState {
        self.state.get()
    }

    /// Returns `true` once a collateral pool is bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.pool.try_borrow().map_or(true, |slot| slot.is_some())
    }

    /// Binds the lender to `pool` and returns the previous binding.
    ///
    /// Grants the pool an unlimited allowance over the lender's base asset
    /// and fyToken, skipping any allowance that is already unlimited.
    ///
    /// # Errors
    ///
    /// - [`FlashError::UnauthorizedCaller`] unless `caller` is the owner.
    /// - [`FlashError::ReentrancyDenied`] while a loan is in flight.
    /// - [`FlashError::InvalidConfiguration`] if the pool prices with a
    ///   different curve.
    pub fn set_collateral_pool(&self, ctx: &mut Context, caller: Address, pool: P) -> Result<Option<P>> {
        if caller != self.owner() {
            return Err(FlashError::UnauthorizedCaller);
        }
        if !self.state.get().is_idle() {
            return Err(FlashError::ReentrancyDenied);
        }
        if pool.curve() != self.curve {
            return Err(FlashError::InvalidConfiguration("pool curve differs from lender curve"));
        }
        let mut slot = self
            .pool
            .try_borrow_mut()
            .map_err(|_| FlashError::ReentrancyDenied)?;

        let lender = self.address();
        let spender = pool.address();
        for token in [pool.base_asset(), pool.yield_token().address()] {
            if ctx.ledger().allowance(token, lender, spender) != Amount::MAX {
                ctx.ledger_mut().approve(token, lender, spender, Amount::MAX);
            }
        }
        debug!(%lender, pool = %spender, base = %pool.base_asset(), "collateral pool bound");
        Ok(slot.replace(pool))
    }

    /// Issuer callback: converts the credit, runs the borrower and repays.
    ///
    /// Reached through the issuer's
    /// [`mint_on_credit`](CreditIssuer::mint_on_credit) during
    /// [`flash_loan`](FlashLender::flash_loan); any other invocation is
    /// refused.
    ///
    /// # Errors
    ///
    /// - [`FlashError::UnauthorizedCaller`] unless `caller` is the bound
    ///   pool's fyToken, or if the bundle names a different receiver.
    /// - [`FlashError::CallbackOutOfSequence`] unless the lender is issuing.
    /// - [`FlashError::MalformedBundle`] if `bundle` cannot be decoded.
    /// - [`FlashError::InsufficientBalance`] if the borrower did not return
    ///   `amount + fee`.
    /// - Any pool, ledger or borrower error.
    pub fn on_credit_issued(
        &self,
        ctx: &mut Context,
        receiver: &dyn FlashBorrower,
        caller: Address,
        yield_amount: Amount,
        bundle: &[u8],
    ) -> Result<()> {
        let slot = self
            .pool
            .try_borrow()
            .map_err(|_| FlashError::UnauthorizedCaller)?;
        let Some(pool) = slot.as_ref() else {
            return Err(FlashError::UnauthorizedCaller);
        };
        if caller != pool.yield_token().address() {
            return Err(FlashError::UnauthorizedCaller);
        }
        if self.state.get() != LoanState::Issuing {
            return Err(FlashError::CallbackOutOfSequence);
        }
        let loan = LoanContext::decode(bundle)?;
        if loan.receiver() != receiver.address() {
            return Err(FlashError::UnauthorizedCaller);
        }

        let lender = self.address();
        let base = pool.base_asset();
        let amount = loan.amount();
        let held_before = ctx.ledger().balance_of(base, lender);

        advance(&self.state, LoanState::Converting);
        let yield_paid = pool.buy_base_asset(ctx, lender, lender, lender, amount)?;
        debug!(%amount, %yield_paid, %yield_amount, "credit converted to base");

        let fee = pool
            .preview_buy_yield_token(ctx, yield_amount)?
            .safe_sub(&amount)?;
        ctx.ledger_mut().transfer(base, lender, receiver.address(), amount)?;

        advance(&self.state, LoanState::BorrowerExecuting);
        receiver.on_flash_loan(ctx, lender, loan.initiator(), base, amount, fee, loan.data())?;

        advance(&self.state, LoanState::Repaying);
        let owed = amount.safe_add(&fee)?;
        let expected = held_before.safe_add(&owed)?;
        if ctx.ledger().balance_of(base, lender) < expected {
            return Err(FlashError::InsufficientBalance);
        }
        self.repay_flash_loan(ctx, pool, yield_amount, owed)
    }

    /// Buys `yield_amount` fyToken back with at most `owed` base asset so
    /// the issuer can retire the credit.
    fn repay_flash_loan(&self, ctx: &mut Context, pool: &P, yield_amount: Amount, owed: Amount) -> Result<()> {
        let cost = pool.preview_buy_yield_token(ctx, yield_amount)?;
        if cost > owed {
            return Err(FlashError::InsufficientBalance);
        }
        let lender = self.address();
        let paid = pool.buy_yield_token(ctx, lender, lender, lender, yield_amount)?;
        debug!(%yield_amount, %paid, %owed, "credit bought back");
        Ok(())
    }

    fn quote_fee(&self, ctx: &Context, pool: &P, amount: Amount) -> Result<Amount> {
        let yield_out = pool.preview_buy_base_asset(ctx, amount)?;
        let after = pool.snapshot(ctx).after_base_out(amount, yield_out)?;
        let base_repaid = quote_buy_yield_token(&self.curve, &after, yield_out, ctx.now())?;
        base_repaid.safe_sub(&amount)
    }
}

impl<P: YieldPool> FlashLender for PoolFlashLender<P> {
    fn flash_supply(&self, ctx: &Context, asset: Address) -> Amount {
        let Ok(slot) = self.pool.try_borrow() else {
            return Amount::ZERO;
        };
        match slot.as_ref() {
            Some(pool) if pool.base_asset() == asset => pool.base_reserve(ctx),
            _ => Amount::ZERO,
        }
    }

    fn flash_fee(&self, ctx: &Context, asset: Address, amount: Amount) -> Result<Amount> {
        let slot = self
            .pool
            .try_borrow()
            .map_err(|_| FlashError::ReentrancyDenied)?;
        let pool = slot.as_ref().ok_or(FlashError::PoolNotSet)?;
        if asset != pool.base_asset() {
            return Err(FlashError::UnsupportedAsset);
        }
        self.quote_fee(ctx, pool, amount)
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
        let _guard = LoanGuard::enter(&self.state, LoanState::Quoting)?;
        let slot = self
            .pool
            .try_borrow()
            .map_err(|_| FlashError::ReentrancyDenied)?;
        let pool = slot.as_ref().ok_or(FlashError::PoolNotSet)?;
        if asset != pool.base_asset() {
            return Err(FlashError::UnsupportedAsset);
        }
        if amount.is_zero() {
            return Err(FlashError::InvalidQuantity("loan amount must be non-zero"));
        }

        let yield_amount = pool.preview_buy_base_asset(ctx, amount)?;
        debug!(%caller, receiver = %receiver.address(), %amount, %yield_amount, "flash loan quoted");

        advance(&self.state, LoanState::Issuing);
        let bundle = LoanContext::new(caller, receiver.address(), amount, data.to_vec()).encode()?;
        let frame = LoanFrame {
            lender: self,
            receiver,
        };
        pool.yield_token()
            .mint_on_credit(ctx, &frame, yield_amount, &bundle)
            .map_err(|err| {
                warn!(error = %err, %amount, "flash loan aborted");
                err
            })?;
        debug!(%amount, "flash loan settled");
        Ok(())
    }
}

/// Issuer callback target for one loan: routes the callback to the lender
/// together with the receiver it was started for.
struct LoanFrame<'a, P> {
    lender: &'a PoolFlashLender<P>,
    receiver: &'a dyn FlashBorrower,
}

impl<P: YieldPool> CreditCallback for LoanFrame<'_, P> {
    fn callback_address(&self) -> Address {
        self.lender.address()
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
