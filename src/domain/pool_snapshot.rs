//! Read-only view of a pool's reserves, real or hypothetical.

use super::{Amount, Timestamp};
use crate::error::{FlashError, Result};

/// Reserves of a YieldSpace pool at one instant, plus the maturity of its
/// fyToken.
///
/// Snapshots are values: the lender reads one from the live pool and then
/// derives *hypothetical* snapshots from it without touching the pool.
///
/// # Examples
///
/// ```
/// use yieldspace_flash::domain::{Amount, PoolSnapshot, Timestamp};
///
/// let live = PoolSnapshot::new(Amount::new(1_000), Amount::new(1_100), Timestamp::new(50));
/// let after = live.after_base_out(Amount::new(10), Amount::new(11)).expect("in range");
/// assert_eq!(after.base_reserve(), Amount::new(990));
/// assert_eq!(after.yield_reserve(), Amount::new(1_111));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolSnapshot {
    base_reserve: Amount,
    yield_reserve: Amount,
    maturity: Timestamp,
}

impl PoolSnapshot {
    /// Creates a snapshot from raw reserves.
    #[must_use]
    pub const fn new(base_reserve: Amount, yield_reserve: Amount, maturity: Timestamp) -> Self {
        Self {
            base_reserve,
            yield_reserve,
            maturity,
        }
    }

    /// Base asset held by the pool.
    #[must_use]
    pub const fn base_reserve(&self) -> Amount {
        self.base_reserve
    }

    /// fyToken held by the pool.
    #[must_use]
    pub const fn yield_reserve(&self) -> Amount {
        self.yield_reserve
    }

    /// Maturity of the pool's fyToken.
    #[must_use]
    pub const fn maturity(&self) -> Timestamp {
        self.maturity
    }

    /// Checks that trading is open: both reserves non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InsufficientReserves`] if either reserve is zero.
    pub fn ensure_tradable(&self) -> Result<()> {
        if self.base_reserve.is_zero() || self.yield_reserve.is_zero() {
            return Err(FlashError::InsufficientReserves("pool reserve is empty"));
        }
        Ok(())
    }

    /// Seconds left until maturity as seen from `now`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::PastMaturity`] at or after maturity.
    pub const fn seconds_to_maturity(&self, now: Timestamp) -> Result<u64> {
        now.seconds_until(self.maturity)
    }

    /// The snapshot the pool would show right after handing out `base_out`
    /// of base asset in exchange for `yield_in` fyToken.
    ///
    /// # Errors
    ///
    /// - [`FlashError::InsufficientReserves`] if `base_out` exceeds the base
    ///   reserve.
    /// - [`FlashError::ArithmeticOverflow`] if the fyToken reserve overflows.
    #[must_use = "this returns the hypothetical snapshot and does not modify the pool"]
    pub fn after_base_out(&self, base_out: Amount, yield_in: Amount) -> Result<Self> {
        let base_reserve = self
            .base_reserve
            .checked_sub(&base_out)
            .ok_or(FlashError::InsufficientReserves("base out exceeds reserve"))?;
        let yield_reserve = self
            .yield_reserve
            .checked_add(&yield_in)
            .ok_or(FlashError::ArithmeticOverflow("hypothetical fyToken reserve"))?;
        Ok(Self {
            base_reserve,
            yield_reserve,
            maturity: self.maturity,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn snap(b: u128, y: u128) -> PoolSnapshot {
        PoolSnapshot::new(Amount::new(b), Amount::new(y), Timestamp::new(1_000))
    }

    #[test]
    fn after_base_out_moves_both_reserves() {
        let Ok(after) = snap(100, 200).after_base_out(Amount::new(40), Amount::new(45)) else {
            panic!("expected Ok");
        };
        assert_eq!(after.base_reserve(), Amount::new(60));
        assert_eq!(after.yield_reserve(), Amount::new(245));
        assert_eq!(after.maturity(), Timestamp::new(1_000));
    }

    #[test]
    fn after_base_out_rejects_overdraw() {
        let err = snap(100, 200).after_base_out(Amount::new(101), Amount::new(1));
        let Err(FlashError::InsufficientReserves(_)) = err else {
            panic!("expected InsufficientReserves");
        };
    }

    #[test]
    fn after_base_out_detects_overflow() {
        let err = snap(100, u128::MAX).after_base_out(Amount::new(1), Amount::new(1));
        let Err(FlashError::ArithmeticOverflow(_)) = err else {
            panic!("expected ArithmeticOverflow");
        };
    }

    #[test]
    fn tradable_requires_both_reserves() {
        assert!(snap(1, 1).ensure_tradable().is_ok());
        assert!(snap(0, 1).ensure_tradable().is_err());
        assert!(snap(1, 0).ensure_tradable().is_err());
    }

    #[test]
    fn seconds_to_maturity_uses_snapshot_maturity() {
        assert_eq!(snap(1, 1).seconds_to_maturity(Timestamp::new(400)), Ok(600));
        assert_eq!(
            snap(1, 1).seconds_to_maturity(Timestamp::new(1_000)),
            Err(FlashError::PastMaturity)
        );
    }
}
