//! Configuration for the in-memory fyToken issuer.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, Timestamp};
use crate::error::{FlashError, Result};

/// Largest fyToken supply an issuer accepts by default (`2^112`).
pub const DEFAULT_SUPPLY_CEILING: Amount = Amount::new(1 << 112);

/// Identity, maturity and supply ceiling of a [`FyToken`](crate::tokens::FyToken).
///
/// # Validation
///
/// - `address` and `underlying` must be non-zero and distinct.
/// - `supply_ceiling` must be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FyTokenConfig {
    address: Address,
    underlying: Address,
    maturity: Timestamp,
    #[serde(default = "default_supply_ceiling")]
    supply_ceiling: Amount,
}

const fn default_supply_ceiling() -> Amount {
    DEFAULT_SUPPLY_CEILING
}

impl FyTokenConfig {
    /// Creates a new `FyTokenConfig` with the default supply ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] if an address is zero
    /// or the two addresses coincide.
    pub fn new(address: Address, underlying: Address, maturity: Timestamp) -> Result<Self> {
        Self::with_ceiling(address, underlying, maturity, DEFAULT_SUPPLY_CEILING)
    }

    /// Creates a new `FyTokenConfig` with an explicit supply ceiling.
    ///
    /// # Errors
    ///
    /// As [`FyTokenConfig::new`], plus a zero ceiling.
    pub fn with_ceiling(
        address: Address,
        underlying: Address,
        maturity: Timestamp,
        supply_ceiling: Amount,
    ) -> Result<Self> {
        let config = Self {
            address,
            underlying,
            maturity,
            supply_ceiling,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`FyTokenConfig::with_ceiling`].
    pub fn validate(&self) -> Result<()> {
        if self.address.is_zero() || self.underlying.is_zero() {
            return Err(FlashError::InvalidConfiguration("fyToken addresses must be non-zero"));
        }
        if self.address == self.underlying {
            return Err(FlashError::InvalidConfiguration("fyToken cannot underlie itself"));
        }
        if self.supply_ceiling.is_zero() {
            return Err(FlashError::InvalidConfiguration("supply ceiling must be non-zero"));
        }
        Ok(())
    }

    /// Returns the fyToken's own address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the asset the fyToken redeems for at maturity.
    #[must_use]
    pub const fn underlying(&self) -> Address {
        self.underlying
    }

    /// Returns the maturity.
    #[must_use]
    pub const fn maturity(&self) -> Timestamp {
        self.maturity
    }

    /// Returns the supply ceiling.
    pub const fn supply_ceiling(&self) -> Amount {
        self.supply_ceiling
    }
}
