//! YieldSpace pool abstraction used by the pool-backed lender.
//!
//! [`YieldPool`] exposes the four trade directions of a base/fyToken pool
//! together with side-effect-free previews.  Previews are default methods
//! built on [`YieldPool::snapshot`] and [`YieldPool::curve`], so an
//! implementor that prices its trades with its previews quotes and executes
//! identically by construction.
//!
//! # Reserve Guard
//!
//! Trades that add base asset and remove fyToken must leave the fyToken
//! reserve at or above the base reserve; otherwise the implied interest
//! rate would turn negative.  The guard is part of the previews.
//!
//! Those same trades refill the base side, so they stay open on a pool whose
//! base reserve is empty.

use tracing::trace;

use super::CreditIssuer;
use crate::config::CurveParams;
use crate::domain::{Address, Amount, PoolSnapshot, Timestamp};
use crate::error::{FlashError, Result};
use crate::runtime::Context;

/// A base/fyToken YieldSpace pool.
///
/// Trades pull the input with `transfer_from(pool, from, pool, amount)`,
/// so `from` must either be `caller` or have approved the pool.  The
/// output is sent to `to`.
///
/// # Errors
///
/// Methods that can fail return [`Result<T, FlashError>`].  Common error
/// variants include:
///
/// - [`FlashError::InsufficientReserves`]: the trade would drain a reserve
///   or break the reserve guard
/// - [`FlashError::PastMaturity`]: the fyToken has matured
/// - [`FlashError::InsufficientAllowance`]: the pool may not pull the input
pub trait YieldPool {
    /// The fyToken this pool trades.
    type Token: CreditIssuer;

    /// The pool's own account.
    fn address(&self) -> Address;

    /// The base asset token.
    fn base_asset(&self) -> Address;

    /// The fyToken issuer.
    fn yield_token(&self) -> &Self::Token;

    /// The curve the pool prices with.
    fn curve(&self) -> CurveParams;

    /// Base asset held by the pool.
    fn base_reserve(&self, ctx: &Context) -> Amount {
        ctx.ledger().balance_of(self.base_asset(), self.address())
    }

    /// FyToken held by the pool.
    fn yield_reserve(&self, ctx: &Context) -> Amount {
        ctx.ledger()
            .balance_of(self.yield_token().address(), self.address())
    }

    /// Current reserves and maturity.
    fn snapshot(&self, ctx: &Context) -> PoolSnapshot {
        PoolSnapshot::new(
            self.base_reserve(ctx),
            self.yield_reserve(ctx),
            self.yield_token().maturity(),
        )
    }

    /// FyToken needed to buy `base_out` base asset.
    ///
    /// # Errors
    ///
    /// See [`CurveParams::yield_in_for_base_out`].
    fn preview_buy_base_asset(&self, ctx: &Context, base_out: Amount) -> Result<Amount> {
        let snapshot = self.snapshot(ctx);
        snapshot.ensure_tradable()?;
        self.curve()
            .yield_in_for_base_out(&snapshot, base_out, ctx.now())
    }

    /// Base asset needed to buy `yield_out` fyToken.
    ///
    /// # Errors
    ///
    /// See [`CurveParams::base_in_for_yield_out`], plus the reserve guard.
    fn preview_buy_yield_token(&self, ctx: &Context, yield_out: Amount) -> Result<Amount> {
        quote_buy_yield_token(&self.curve(), &self.snapshot(ctx), yield_out, ctx.now())
    }

    /// FyToken received for selling `base_in` base asset.
    ///
    /// # Errors
    ///
    /// See [`CurveParams::yield_out_for_base_in`], plus the reserve guard.
    fn preview_sell_base_asset(&self, ctx: &Context, base_in: Amount) -> Result<Amount> {
        let snapshot = self.snapshot(ctx);
        let yield_out = self
            .curve()
            .yield_out_for_base_in(&snapshot, base_in, ctx.now())?;
        ensure_yield_covers_base(&snapshot, base_in, yield_out)?;
        Ok(yield_out)
    }

    /// Base asset received for selling `yield_in` fyToken.
    ///
    /// # Errors
    ///
    /// See [`CurveParams::base_out_for_yield_in`].
    fn preview_sell_yield_token(&self, ctx: &Context, yield_in: Amount) -> Result<Amount> {
        let snapshot = self.snapshot(ctx);
        snapshot.ensure_tradable()?;
        self.curve()
            .base_out_for_yield_in(&snapshot, yield_in, ctx.now())
    }

    /// Buys exactly `base_out` base asset, paying fyToken from `from`.
    /// Returns the fyToken paid.
    ///
    /// # Errors
    ///
    /// As [`YieldPool::preview_buy_base_asset`], plus transfer failures.
    fn buy_base_asset(
        &self,
        ctx: &mut Context,
        caller: Address,
        from: Address,
        to: Address,
        base_out: Amount,
    ) -> Result<Amount>;

    /// Buys exactly `yield_out` fyToken, paying base asset from `from`.
    /// Returns the base asset paid.
    ///
    /// # Errors
    ///
    /// As [`YieldPool::preview_buy_yield_token`], plus transfer failures.
    fn buy_yield_token(
        &self,
        ctx: &mut Context,
        caller: Address,
        from: Address,
        to: Address,
        yield_out: Amount,
    ) -> Result<Amount>;

    /// Sells exactly `base_in` base asset from `from`.  Returns the fyToken
    /// received.
    ///
    /// # Errors
    ///
    /// As [`YieldPool::preview_sell_base_asset`], plus transfer failures.
    fn sell_base_asset(
        &self,
        ctx: &mut Context,
        caller: Address,
        from: Address,
        to: Address,
        base_in: Amount,
    ) -> Result<Amount>;

    /// Sells exactly `yield_in` fyToken from `from`.  Returns the base
    /// asset received.
    ///
    /// # Errors
    ///
    /// As [`YieldPool::preview_sell_yield_token`], plus transfer failures.
    fn sell_yield_token(
        &self,
        ctx: &mut Context,
        caller: Address,
        from: Address,
        to: Address,
        yield_in: Amount,
    ) -> Result<Amount>;
}

/// Base asset needed to buy `yield_out` fyToken from `snapshot`, reserve
/// guard included.
///
/// Shared by [`YieldPool::preview_buy_yield_token`] and by lenders pricing
/// a buy-back on hypothetical reserves, so both refuse the same trades.
///
/// # Errors
///
/// See [`CurveParams::base_in_for_yield_out`], plus the reserve guard.
pub(crate) fn quote_buy_yield_token(
    curve: &CurveParams,
    snapshot: &PoolSnapshot,
    yield_out: Amount,
    now: Timestamp,
) -> Result<Amount> {
    let base_in = curve.base_in_for_yield_out(snapshot, yield_out, now)?;
    ensure_yield_covers_base(snapshot, base_in, yield_out)?;
    Ok(base_in)
}

/// Rejects a base-in / fyToken-out trade that would leave fewer fyToken
/// than base in the pool.
fn ensure_yield_covers_base(snapshot: &PoolSnapshot, base_in: Amount, yield_out: Amount) -> Result<()> {
    let base_after = snapshot
        .base_reserve()
        .checked_add(&base_in)
        .ok_or(FlashError::ArithmeticOverflow("base reserve after trade"))?;
    let yield_after = snapshot
        .yield_reserve()
        .checked_sub(&yield_out)
        .ok_or(FlashError::InsufficientReserves("fyToken out exceeds reserve"))?;
    if yield_after < base_after {
        trace!(%base_after, %yield_after, "reserve guard tripped");
        return Err(FlashError::InsufficientReserves("fyToken reserves too low"));
    }
    Ok(())
}
