//! Arithmetic for the YieldSpace curve.
//!
//! This module provides [`CheckedArithmetic`] for overflow-safe amount
//! operations, the [`fixed_exp`] binary log/exp engine used to raise values
//! to fractional powers, and the four YieldSpace pricing functions.
//!
//! # Number formats
//!
//! | Quantity | Type | Format |
//! |----------|------|--------|
//! | Amounts | [`Amount`](crate::domain::Amount) | raw `u128` |
//! | Powers and roots | `ethnum::U256` | unsigned Q.64 |
//! | Logarithms | `i128` | signed Q.112 |
//! | Curve exponent, time scale, fee | `fixed::types::U64F64` | unsigned Q.64 |

mod checked;
pub mod fixed_exp;
mod yield_math;

pub use checked::CheckedArithmetic;
pub use yield_math::{
    base_in_for_yield_out, base_out_for_yield_in, exponent, yield_in_for_base_out,
    yield_out_for_base_in,
};
