//! In-memory flash-mintable fyToken.

use tracing::trace;

use crate::config::FyTokenConfig;
use crate::domain::{Address, Amount, Timestamp};
use crate::error::{FlashError, Result};
use crate::runtime::Context;
use crate::traits::{CreditCallback, CreditIssuer};

/// A zero-coupon fyToken whose balances live in the host ledger.
///
/// Minting is refused at or after maturity and above the supply ceiling.
/// [`mint_on_credit`](CreditIssuer::mint_on_credit) burns what it minted
/// once the callback returns, so a flash mint never changes the supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FyToken {
    config: FyTokenConfig,
}

impl FyToken {
    /// Creates the issuer.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] if the configuration is
    /// invalid.
    pub fn new(config: FyTokenConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the issuer configuration.
    #[must_use]
    pub const fn config(&self) -> &FyTokenConfig {
        &self.config
    }

    /// Asset the fyToken redeems for at maturity.
    #[must_use]
    pub const fn underlying(&self) -> Address {
        self.config.underlying()
    }

    /// Issues `amount` fyToken to `to`.
    ///
    /// # Errors
    ///
    /// - [`FlashError::PastMaturity`] at or after maturity.
    /// - [`FlashError::SupplyCeilingExceeded`] if the supply would exceed
    ///   the ceiling.
    pub fn mint(&self, ctx: &mut Context, to: Address, amount: Amount) -> Result<()> {
        ctx.now().seconds_until(self.maturity())?;
        let supply = self
            .total_supply(ctx)
            .checked_add(&amount)
            .ok_or(FlashError::SupplyCeilingExceeded)?;
        if supply > self.supply_ceiling() {
            return Err(FlashError::SupplyCeilingExceeded);
        }
        ctx.ledger_mut().mint(self.address(), to, amount)
    }
}

impl CreditIssuer for FyToken {
    fn address(&self) -> Address {
        self.config.address()
    }

    fn maturity(&self) -> Timestamp {
        self.config.maturity()
    }

    fn supply_ceiling(&self) -> Amount {
        self.config.supply_ceiling()
    }

    fn mint_on_credit(
        &self,
        ctx: &mut Context,
        callback: &dyn CreditCallback,
        amount: Amount,
        bundle: &[u8],
    ) -> Result<()> {
        let holder = callback.callback_address();
        self.mint(ctx, holder, amount)?;
        trace!(fy_token = %self.address(), %holder, %amount, "credit issued");

        callback.on_credit_issued(ctx, self.address(), amount, bundle)?;

        ctx.ledger_mut().burn(self.address(), holder, amount)?;
        trace!(fy_token = %self.address(), %holder, %amount, "credit retired");
        Ok(())
    }
}
