//! In-memory YieldSpace pool (base asset against fyToken).
//!
//! The pool keeps no reserve counters of its own: its reserves are its
//! ledger balances, so anything transferred to the pool account is
//! liquidity.  Every trade is priced by the corresponding preview on
//! [`YieldPool`], which makes quote and execution agree to the unit.
//!
//! # Trade Algorithm (buy base asset)
//!
//! 1. `yield_in = preview_buy_base_asset(base_out)`
//! 2. pull `yield_in` fyToken from `from` into the pool
//! 3. send `base_out` base asset from the pool to `to`

use tracing::trace;

use crate::config::{CurveParams, YieldSpaceConfig};
use crate::domain::{Address, Amount};
use crate::error::{FlashError, Result};
use crate::runtime::Context;
use crate::traits::{CreditIssuer, YieldPool};

/// A YieldSpace pool over a fyToken issuer `T`.
///
/// # Example
///
/// ```rust
/// use yieldspace_flash::config::{CurveConfig, FyTokenConfig, YieldSpaceConfig};
/// use yieldspace_flash::domain::{Address, Amount, Timestamp};
/// use yieldspace_flash::pools::YieldSpacePool;
/// use yieldspace_flash::runtime::Runtime;
/// use yieldspace_flash::tokens::FyToken;
/// use yieldspace_flash::traits::YieldPool;
///
/// let base = Address::repeat(0xba);
/// let fy_cfg = FyTokenConfig::new(Address::repeat(0xf1), base, Timestamp::new(31_536_000))
///     .expect("valid fyToken");
/// let pool_cfg = YieldSpaceConfig::new(Address::repeat(0x9a), base, CurveConfig::default())
///     .expect("valid pool");
/// let fy_token = FyToken::new(fy_cfg).expect("fyToken");
/// let pool = YieldSpacePool::new(pool_cfg, fy_token).expect("pool");
///
/// let mut rt = Runtime::new(Timestamp::new(0));
/// rt.execute(|ctx| {
///     ctx.ledger_mut().mint(base, pool.address(), Amount::new(1_000_000))?;
///     pool.yield_token().mint(ctx, pool.address(), Amount::new(1_100_000))
/// })
/// .expect("seeded");
///
/// let quote = pool.preview_buy_base_asset(rt.context(), Amount::new(10_000)).expect("quote");
/// assert!(quote > Amount::new(10_000));
/// ```
#[derive(Debug, Clone)]
pub struct YieldSpacePool<T> {
    config: YieldSpaceConfig,
    curve: CurveParams,
    fy_token: T,
}

impl<T: CreditIssuer> YieldSpacePool<T> {
    /// Creates a pool trading `fy_token` against the configured base asset.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] if the configuration is
    /// invalid or the fyToken address collides with the pool or the base
    /// asset.
    pub fn new(config: YieldSpaceConfig, fy_token: T) -> Result<Self> {
        let curve = config.curve().params()?;
        let fy = fy_token.address();
        if fy.is_zero() || fy == config.address() || fy == config.base_asset() {
            return Err(FlashError::InvalidConfiguration("fyToken address collides with pool"));
        }
        Ok(Self {
            config,
            curve,
            fy_token,
        })
    }

    /// Returns the pool configuration.
    #[must_use]
    pub const fn config(&self) -> &YieldSpaceConfig {
        &self.config
    }

    fn ensure_owner_of_funds(caller: Address, from: Address) -> Result<()> {
        if caller != from {
            return Err(FlashError::UnauthorizedCaller);
        }
        Ok(())
    }

    fn settle(
        &self,
        ctx: &mut Context,
        from: Address,
        to: Address,
        (token_in, amount_in): (Address, Amount),
        (token_out, amount_out): (Address, Amount),
    ) -> Result<()> {
        let pool = self.address();
        ctx.ledger_mut()
            .transfer_from(token_in, pool, from, pool, amount_in)?;
        ctx.ledger_mut().transfer(token_out, pool, to, amount_out)?;
        trace!(%pool, %token_in, %amount_in, %token_out, %amount_out, "pool trade");
        Ok(())
    }
}

impl<T: CreditIssuer> YieldPool for YieldSpacePool<T> {
    type Token = T;

    fn address(&self) -> Address {
        self.config.address()
    }

    fn base_asset(&self) -> Address {
        self.config.base_asset()
    }

    fn yield_token(&self) -> &T {
        &self.fy_token
    }

    fn curve(&self) -> CurveParams {
        self.curve
    }

    fn buy_base_asset(
        &self,
        ctx: &mut Context,
        caller: Address,
        from: Address,
        to: Address,
        base_out: Amount,
    ) -> Result<Amount> {
        Self::ensure_owner_of_funds(caller, from)?;
        let yield_in = self.preview_buy_base_asset(ctx, base_out)?;
        self.settle(
            ctx,
            from,
            to,
            (self.fy_token.address(), yield_in),
            (self.base_asset(), base_out),
        )?;
        Ok(yield_in)
    }

    fn buy_yield_token(
        &self,
        ctx: &mut Context,
        caller: Address,
        from: Address,
        to: Address,
        yield_out: Amount,
    ) -> Result<Amount> {
        Self::ensure_owner_of_funds(caller, from)?;
        let base_in = self.preview_buy_yield_token(ctx, yield_out)?;
        self.settle(
            ctx,
            from,
            to,
            (self.base_asset(), base_in),
            (self.fy_token.address(), yield_out),
        )?;
        Ok(base_in)
    }

    fn sell_base_asset(
        &self,
        ctx: &mut Context,
        caller: Address,
        from: Address,
        to: Address,
        base_in: Amount,
    ) -> Result<Amount> {
        Self::ensure_owner_of_funds(caller, from)?;
        let yield_out = self.preview_sell_base_asset(ctx, base_in)?;
        self.settle(
            ctx,
            from,
            to,
            (self.base_asset(), base_in),
            (self.fy_token.address(), yield_out),
        )?;
        Ok(yield_out)
    }

    fn sell_yield_token(
        &self,
        ctx: &mut Context,
        caller: Address,
        from: Address,
        to: Address,
        yield_in: Amount,
    ) -> Result<Amount> {
        Self::ensure_owner_of_funds(caller, from)?;
        let base_out = self.preview_sell_yield_token(ctx, yield_in)?;
        self.settle(
            ctx,
            from,
            to,
            (self.fy_token.address(), yield_in),
            (self.base_asset(), base_out),
        )?;
        Ok(base_out)
    }
}
