//! Configuration for the pool-backed flash lender.

use serde::{Deserialize, Serialize};

use super::CurveConfig;
use crate::domain::Address;
use crate::error::{FlashError, Result};

/// Identity and pricing parameters of a
/// [`PoolFlashLender`](crate::lenders::PoolFlashLender).
///
/// The lender prices its fee with `curve`; a collateral pool is accepted
/// only if it trades on the same curve.
///
/// # Validation
///
/// - `owner` and `address` must be non-zero and distinct.
/// - `curve` must itself be valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LenderConfig {
    owner: Address,
    address: Address,
    #[serde(default)]
    curve: CurveConfig,
}

impl LenderConfig {
    /// Creates a new `LenderConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] if an address is zero,
    /// the two addresses coincide or the curve is invalid.
    pub fn new(owner: Address, address: Address, curve: CurveConfig) -> Result<Self> {
        let config = Self {
            owner,
            address,
            curve,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`LenderConfig::new`].
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_zero() {
            return Err(FlashError::InvalidConfiguration("owner must be non-zero"));
        }
        if self.address.is_zero() {
            return Err(FlashError::InvalidConfiguration("lender address must be non-zero"));
        }
        if self.owner == self.address {
            return Err(FlashError::InvalidConfiguration("lender cannot own itself"));
        }
        self.curve.validate()
    }

    /// Returns the account allowed to rebind the collateral pool.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Returns the lender's own account.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the curve the lender prices with.
    #[must_use]
    pub const fn curve(&self) -> CurveConfig {
        self.curve
    }
}
