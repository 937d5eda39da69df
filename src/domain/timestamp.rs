//! Wall-clock time in whole seconds.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FlashError, Result};

/// Unix time in seconds.
///
/// The only temporal quantity the curve needs is the number of seconds
/// left until the fyToken matures; [`seconds_until`](Self::seconds_until)
/// computes it and refuses to run once maturity is reached.
///
/// # Examples
///
/// ```
/// use yieldspace_flash::domain::Timestamp;
///
/// let now = Timestamp::new(1_000);
/// let maturity = Timestamp::new(1_600);
/// assert_eq!(now.seconds_until(maturity), Ok(600));
/// assert!(maturity.seconds_until(now).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp from unix seconds.
    #[must_use]
    pub const fn new(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Returns the unix seconds.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Seconds remaining from `self` until `maturity`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::PastMaturity`] if `self >= maturity`.
    pub const fn seconds_until(&self, maturity: Timestamp) -> Result<u64> {
        if self.0 >= maturity.0 {
            return Err(FlashError::PastMaturity);
        }
        Ok(maturity.0 - self.0)
    }

    /// Returns a timestamp `seconds` later, saturating at `u64::MAX`.
    #[must_use]
    pub const fn plus_seconds(&self, seconds: u64) -> Self {
        Self(self.0.saturating_add(seconds))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}
