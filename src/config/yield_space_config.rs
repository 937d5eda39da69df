//! Configuration for the in-memory YieldSpace pool.

use serde::{Deserialize, Serialize};

use super::CurveConfig;
use crate::domain::Address;
use crate::error::{FlashError, Result};

/// Identity and curve of a [`YieldSpacePool`](crate::pools::YieldSpacePool).
///
/// The pool's reserves are its ledger balances of `base_asset` and of the
/// fyToken; they are seeded by transferring tokens to `address`.
///
/// # Validation
///
/// - `address` and `base_asset` must be non-zero and distinct.
/// - `curve` must itself be valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YieldSpaceConfig {
    address: Address,
    base_asset: Address,
    #[serde(default)]
    curve: CurveConfig,
}

impl YieldSpaceConfig {
    /// Creates a new `YieldSpaceConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] if an address is zero,
    /// the two addresses coincide or the curve is invalid.
    pub fn new(address: Address, base_asset: Address, curve: CurveConfig) -> Result<Self> {
        let config = Self {
            address,
            base_asset,
            curve,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`YieldSpaceConfig::new`].
    pub fn validate(&self) -> Result<()> {
        if self.address.is_zero() || self.base_asset.is_zero() {
            return Err(FlashError::InvalidConfiguration("pool addresses must be non-zero"));
        }
        if self.address == self.base_asset {
            return Err(FlashError::InvalidConfiguration("pool cannot be its own base asset"));
        }
        self.curve.validate()
    }

    /// Returns the pool's account.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the base asset token.
    #[must_use]
    pub const fn base_asset(&self) -> Address {
        self.base_asset
    }

    /// Returns the pool's curve.
    #[must_use]
    pub const fn curve(&self) -> CurveConfig {
        self.curve
    }
}
