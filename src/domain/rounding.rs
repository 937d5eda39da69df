//! Explicit rounding direction for fixed-point to integer conversion.

/// Direction in which a fractional result is turned into an [`Amount`].
///
/// Pricing always rounds against the trader: amounts the trader pays are
/// rounded [`Up`](Rounding::Up), amounts the trader receives are rounded
/// [`Down`](Rounding::Down).
///
/// [`Amount`]: super::Amount
///
/// # Examples
///
/// ```
/// use yieldspace_flash::domain::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// assert!(Rounding::Down.is_down());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` if this is [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }
}
