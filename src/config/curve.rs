//! Curve parameters shared by the pool and the lender.

use fixed::types::U64F64;
use serde::{Deserialize, Serialize};

use crate::domain::{Amount, PoolSnapshot, Timestamp};
use crate::error::{FlashError, Result};
use crate::math;

/// Seconds in four 365-day years.
pub const FOUR_YEARS_SECONDS: u64 = 126_144_000;

/// Declarative curve configuration.
///
/// Integer fields only, so the same file always yields the same
/// [`CurveParams`] bits.
///
/// # Derived Values
///
/// - `k = 1 / time_scale_seconds`
/// - `g1 = fee_numerator / fee_denominator` (base flows into the pool)
/// - `g2 = fee_denominator / fee_numerator` (base flows out of the pool)
///
/// # Validation
///
/// - `time_scale_seconds` must be non-zero.
/// - `0 < fee_numerator <= fee_denominator`.
///
/// # Examples
///
/// ```
/// use yieldspace_flash::config::CurveConfig;
///
/// let config = CurveConfig::default();
/// assert_eq!(config.time_scale_seconds(), 126_144_000);
/// assert!(config.params().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurveConfig {
    time_scale_seconds: u64,
    fee_numerator: u64,
    fee_denominator: u64,
}

impl CurveConfig {
    /// Creates a new `CurveConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] if any field is out of
    /// range.
    pub fn new(time_scale_seconds: u64, fee_numerator: u64, fee_denominator: u64) -> Result<Self> {
        let config = Self {
            time_scale_seconds,
            fee_numerator,
            fee_denominator,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] if any field is out of
    /// range.
    pub fn validate(&self) -> Result<()> {
        if self.time_scale_seconds == 0 {
            return Err(FlashError::InvalidConfiguration("time scale must be non-zero"));
        }
        if self.fee_numerator == 0 || self.fee_denominator == 0 {
            return Err(FlashError::InvalidConfiguration("fee terms must be non-zero"));
        }
        if self.fee_numerator > self.fee_denominator {
            return Err(FlashError::InvalidConfiguration("trade fee factor above one"));
        }
        Ok(())
    }

    /// Returns the time scale in seconds (`1 / k`).
    #[must_use]
    pub const fn time_scale_seconds(&self) -> u64 {
        self.time_scale_seconds
    }

    /// Returns the fee numerator.
    #[must_use]
    pub const fn fee_numerator(&self) -> u64 {
        self.fee_numerator
    }

    /// Returns the fee denominator.
    #[must_use]
    pub const fn fee_denominator(&self) -> u64 {
        self.fee_denominator
    }

    /// Converts to fixed-point parameters.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] if the configuration is
    /// invalid (it may have been deserialized without validation).
    pub fn params(&self) -> Result<CurveParams> {
        self.validate()?;
        let one = 1u128 << 64;
        let numerator = u128::from(self.fee_numerator);
        let denominator = u128::from(self.fee_denominator);
        Ok(CurveParams {
            time_scale: U64F64::from_bits(one / u128::from(self.time_scale_seconds)),
            trade_fee: U64F64::from_bits((numerator << 64) / denominator),
            inverse_fee: U64F64::from_bits((denominator << 64) / numerator),
        })
    }
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            time_scale_seconds: FOUR_YEARS_SECONDS,
            fee_numerator: 950,
            fee_denominator: 1000,
        }
    }
}

/// Fixed-point curve parameters.
///
/// Two parties pricing with equal `CurveParams` against the same reserves
/// at the same time always agree to the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveParams {
    time_scale: U64F64,
    trade_fee: U64F64,
    inverse_fee: U64F64,
}

impl CurveParams {
    /// Returns `k`.
    #[must_use]
    pub const fn time_scale(&self) -> U64F64 {
        self.time_scale
    }

    /// Returns `g1`, applied when base flows into the pool.
    #[must_use]
    pub const fn trade_fee(&self) -> U64F64 {
        self.trade_fee
    }

    /// Returns `g2 = 1 / g1`, applied when base flows out of the pool.
    #[must_use]
    pub const fn inverse_fee(&self) -> U64F64 {
        self.inverse_fee
    }

    /// Base asset needed to buy `yield_out` fyToken from `snapshot`.
    ///
    /// # Errors
    ///
    /// Propagates [`math::base_in_for_yield_out`] errors and
    /// [`FlashError::PastMaturity`].
    pub fn base_in_for_yield_out(
        &self,
        snapshot: &PoolSnapshot,
        yield_out: Amount,
        now: Timestamp,
    ) -> Result<Amount> {
        math::base_in_for_yield_out(
            snapshot.base_reserve(),
            snapshot.yield_reserve(),
            yield_out,
            snapshot.seconds_to_maturity(now)?,
            self.time_scale,
            self.trade_fee,
        )
    }

    /// FyToken needed to buy `base_out` base asset from `snapshot`.
    ///
    /// # Errors
    ///
    /// Propagates [`math::yield_in_for_base_out`] errors and
    /// [`FlashError::PastMaturity`].
    pub fn yield_in_for_base_out(
        &self,
        snapshot: &PoolSnapshot,
        base_out: Amount,
        now: Timestamp,
    ) -> Result<Amount> {
        math::yield_in_for_base_out(
            snapshot.base_reserve(),
            snapshot.yield_reserve(),
            base_out,
            snapshot.seconds_to_maturity(now)?,
            self.time_scale,
            self.inverse_fee,
        )
    }

    /// FyToken received for selling `base_in` base asset into `snapshot`.
    ///
    /// # Errors
    ///
    /// Propagates [`math::yield_out_for_base_in`] errors and
    /// [`FlashError::PastMaturity`].
    pub fn yield_out_for_base_in(
        &self,
        snapshot: &PoolSnapshot,
        base_in: Amount,
        now: Timestamp,
    ) -> Result<Amount> {
        math::yield_out_for_base_in(
            snapshot.base_reserve(),
            snapshot.yield_reserve(),
            base_in,
            snapshot.seconds_to_maturity(now)?,
            self.time_scale,
            self.trade_fee,
        )
    }

    /// Base asset received for selling `yield_in` fyToken into `snapshot`.
    ///
    /// # Errors
    ///
    /// Propagates [`math::base_out_for_yield_in`] errors and
    /// [`FlashError::PastMaturity`].
    pub fn base_out_for_yield_in(
        &self,
        snapshot: &PoolSnapshot,
        yield_in: Amount,
        now: Timestamp,
    ) -> Result<Amount> {
        math::base_out_for_yield_in(
            snapshot.base_reserve(),
            snapshot.yield_reserve(),
            yield_in,
            snapshot.seconds_to_maturity(now)?,
            self.time_scale,
            self.inverse_fee,
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn params() -> CurveParams {
        let Ok(p) = CurveConfig::default().params() else {
            panic!("default config is valid");
        };
        p
    }

    #[test]
    fn default_is_four_years_and_five_percent() {
        let c = CurveConfig::default();
        assert_eq!(c.time_scale_seconds(), FOUR_YEARS_SECONDS);
        assert_eq!(c.fee_numerator(), 950);
        assert_eq!(c.fee_denominator(), 1000);
    }

    #[test]
    fn zero_time_scale_rejected() {
        let Err(FlashError::InvalidConfiguration(_)) = CurveConfig::new(0, 950, 1000) else {
            panic!("expected InvalidConfiguration");
        };
    }

    #[test]
    fn zero_fee_terms_rejected() {
        assert!(CurveConfig::new(FOUR_YEARS_SECONDS, 0, 1000).is_err());
        assert!(CurveConfig::new(FOUR_YEARS_SECONDS, 950, 0).is_err());
    }

    #[test]
    fn fee_above_one_rejected() {
        assert!(CurveConfig::new(FOUR_YEARS_SECONDS, 1001, 1000).is_err());
    }

    #[test]
    fn params_bits_are_exact() {
        let p = params();
        assert_eq!(p.time_scale().to_bits(), (1u128 << 64) / 126_144_000);
        assert_eq!(p.trade_fee().to_bits(), (950u128 << 64) / 1000);
        assert_eq!(p.inverse_fee().to_bits(), (1000u128 << 64) / 950);
        assert!(p.trade_fee() < U64F64::ONE);
        assert!(p.inverse_fee() > U64F64::ONE);
    }

    #[test]
    fn equal_configs_give_equal_params() {
        let Ok(a) = CurveConfig::new(FOUR_YEARS_SECONDS, 95, 100) else {
            panic!("valid");
        };
        let Ok(b) = CurveConfig::new(FOUR_YEARS_SECONDS, 950, 1000) else {
            panic!("valid");
        };
        // 95/100 and 950/1000 are the same ratio, so the bits agree.
        assert_eq!(a.params(), b.params());
    }

    #[test]
    fn serde_round_trip() {
        let config = CurveConfig::default();
        let Ok(json) = serde_json::to_string(&config) else {
            panic!("serializes");
        };
        let Ok(back) = serde_json::from_str::<CurveConfig>(&json) else {
            panic!("deserializes");
        };
        assert_eq!(back, config);
    }

    #[test]
    fn unvalidated_json_fails_at_params() {
        let json = r#"{"time_scale_seconds":0,"fee_numerator":950,"fee_denominator":1000}"#;
        let Ok(config) = serde_json::from_str::<CurveConfig>(json) else {
            panic!("deserializes");
        };
        assert!(config.params().is_err());
    }

    #[test]
    fn direction_fees_are_applied() {
        let p = params();
        let snap = PoolSnapshot::new(
            Amount::new(1_000_000),
            Amount::new(1_100_000),
            Timestamp::new(31_536_000),
        );
        let now = Timestamp::new(0);
        let Ok(yield_in) = p.yield_in_for_base_out(&snap, Amount::new(10_000), now) else {
            panic!("expected Ok");
        };
        let Ok(base_out) = p.base_out_for_yield_in(&snap, Amount::new(10_000), now) else {
            panic!("expected Ok");
        };
        assert_eq!(yield_in, Amount::new(10_281));
        assert_eq!(base_out, Amount::new(9_728));
    }

    #[test]
    fn matured_snapshot_cannot_price() {
        let p = params();
        let snap = PoolSnapshot::new(Amount::new(1_000), Amount::new(1_000), Timestamp::new(100));
        assert_eq!(
            p.base_in_for_yield_out(&snap, Amount::new(1), Timestamp::new(100)),
            Err(FlashError::PastMaturity)
        );
    }
}
