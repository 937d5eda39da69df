//! Checked arithmetic on [`Amount`] that reports typed errors.
//!
//! [`Amount`]'s own `checked_*` methods return `Option`; the
//! [`CheckedArithmetic`] trait maps `None` to the [`FlashError`] variant
//! that describes what went wrong, so lender and ledger code can use `?`.
//!
//! # Examples
//!
//! ```
//! use yieldspace_flash::domain::Amount;
//! use yieldspace_flash::math::CheckedArithmetic;
//!
//! let owed = Amount::new(10_000).safe_add(&Amount::new(27));
//! assert_eq!(owed, Ok(Amount::new(10_027)));
//! ```

use crate::domain::Amount;
use crate::error::FlashError;

/// Fallible arithmetic for amounts.
///
/// # Contract
///
/// - **No panics**: all error conditions produce `Err`.
/// - **No saturation**: saturation hides bugs; errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::ArithmeticOverflow`] on overflow.
    fn safe_add(&self, other: &Self) -> Result<Self, FlashError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, FlashError>;
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, FlashError> {
        self.checked_add(other)
            .ok_or(FlashError::ArithmeticOverflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, FlashError> {
        self.checked_sub(other)
            .ok_or(FlashError::Underflow("amount subtraction underflow"))
    }
}
