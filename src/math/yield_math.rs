//! YieldSpace pricing: the time-decaying constant-power invariant.
//!
//! A YieldSpace pool holding `x` base asset and `y` fyToken keeps
//!
//! ```text
//! x^(1 - g·k·t) + y^(1 - g·k·t) = const
//! ```
//!
//! across trades, where `t` is the number of seconds left until the fyToken
//! matures, `k` is the time scale (≈ 1 / seconds in four years) and `g` is
//! the fee factor for the direction of the trade.  As `t → 0` the exponent
//! tends to one and the curve flattens into a 1:1 exchange.
//!
//! Every function here is pure.  Inputs and outputs are [`Amount`]s; the
//! powers are evaluated in Q.64 by [`fixed_exp`](super::fixed_exp).  Amounts
//! the trader pays round up, amounts the trader receives round down.
//!
//! | Function | Trade | Formula |
//! |----------|-------|---------|
//! | [`base_in_for_yield_out`] | buy fyToken | `(x^a + y^a - (y-Δy)^a)^(1/a) - x` |
//! | [`yield_in_for_base_out`] | buy base | `(x^a + y^a - (x-Δx)^a)^(1/a) - y` |
//! | [`yield_out_for_base_in`] | sell base | `y - (x^a + y^a - (x+Δx)^a)^(1/a)` |
//! | [`base_out_for_yield_in`] | sell fyToken | `x - (x^a + y^a - (y+Δy)^a)^(1/a)` |

use ethnum::U256;
use fixed::types::U64F64;

use super::fixed_exp::{self, from_amount, to_amount};
use crate::domain::{Amount, Rounding};
use crate::error::{FlashError, Result};

/// Raw bits of `1.0` in U64F64.
const ONE_BITS: u128 = 1 << 64;

/// Amount of base asset a trader must pay to take `yield_out` fyToken out
/// of a pool holding `base_reserve` and `yield_reserve`.
///
/// # Errors
///
/// - [`FlashError::PastMaturity`] if `seconds_to_maturity` is zero.
/// - [`FlashError::InsufficientReserves`] if `yield_out` exceeds the
///   fyToken reserve.
/// - [`FlashError::ArithmeticOverflow`] if the exponent is not positive or
///   a value leaves the fixed-point range.
pub fn base_in_for_yield_out(
    base_reserve: Amount,
    yield_reserve: Amount,
    yield_out: Amount,
    seconds_to_maturity: u64,
    time_scale: U64F64,
    g: U64F64,
) -> Result<Amount> {
    let a = exponent(seconds_to_maturity, time_scale, g)?;
    if yield_out.is_zero() {
        return Ok(Amount::ZERO);
    }
    let yield_after = yield_reserve
        .checked_sub(&yield_out)
        .ok_or(FlashError::InsufficientReserves("fyToken out exceeds reserve"))?;

    let sum = invariant(base_reserve, yield_reserve, a)?
        .checked_sub(raise(yield_after, a)?)
        .ok_or(FlashError::InsufficientReserves("curve sum went negative"))?;
    let base_after = to_amount(root(sum, a)?, Rounding::Up)?;
    base_after
        .checked_sub(&base_reserve)
        .ok_or(FlashError::Underflow("rounding induced error"))
}

/// Amount of fyToken a trader must pay to take `base_out` base asset out of
/// the pool.
///
/// Taking out the whole base reserve is allowed; taking out more is not.
///
/// # Errors
///
/// - [`FlashError::PastMaturity`] if `seconds_to_maturity` is zero.
/// - [`FlashError::InsufficientReserves`] if `base_out` exceeds the base
///   reserve.
/// - [`FlashError::ArithmeticOverflow`] if the exponent is not positive or
///   a value leaves the fixed-point range.
pub fn yield_in_for_base_out(
    base_reserve: Amount,
    yield_reserve: Amount,
    base_out: Amount,
    seconds_to_maturity: u64,
    time_scale: U64F64,
    g: U64F64,
) -> Result<Amount> {
    let a = exponent(seconds_to_maturity, time_scale, g)?;
    if base_out.is_zero() {
        return Ok(Amount::ZERO);
    }
    let base_after = base_reserve
        .checked_sub(&base_out)
        .ok_or(FlashError::InsufficientReserves("base out exceeds reserve"))?;

    let sum = invariant(base_reserve, yield_reserve, a)?
        .checked_sub(raise(base_after, a)?)
        .ok_or(FlashError::InsufficientReserves("curve sum went negative"))?;
    let yield_after = to_amount(root(sum, a)?, Rounding::Up)?;
    yield_after
        .checked_sub(&yield_reserve)
        .ok_or(FlashError::Underflow("rounding induced error"))
}

/// Amount of fyToken a trader receives for paying `base_in` base asset.
///
/// # Errors
///
/// - [`FlashError::PastMaturity`] if `seconds_to_maturity` is zero.
/// - [`FlashError::InsufficientReserves`] if `base_in` would buy the whole
///   fyToken reserve.
/// - [`FlashError::ArithmeticOverflow`] if the base reserve overflows, the
///   exponent is not positive or a value leaves the fixed-point range.
pub fn yield_out_for_base_in(
    base_reserve: Amount,
    yield_reserve: Amount,
    base_in: Amount,
    seconds_to_maturity: u64,
    time_scale: U64F64,
    g: U64F64,
) -> Result<Amount> {
    let a = exponent(seconds_to_maturity, time_scale, g)?;
    if base_in.is_zero() {
        return Ok(Amount::ZERO);
    }
    let base_after = base_reserve
        .checked_add(&base_in)
        .ok_or(FlashError::ArithmeticOverflow("base reserve after trade"))?;

    let sum = remaining_sum(invariant(base_reserve, yield_reserve, a)?, raise(base_after, a)?)?;
    let yield_after = to_amount(root(sum, a)?, Rounding::Up)?;
    yield_reserve
        .checked_sub(&yield_after)
        .ok_or(FlashError::Underflow("rounding induced error"))
}

/// Amount of base asset a trader receives for paying `yield_in` fyToken.
///
/// # Errors
///
/// - [`FlashError::PastMaturity`] if `seconds_to_maturity` is zero.
/// - [`FlashError::InsufficientReserves`] if `yield_in` would buy the whole
///   base reserve.
/// - [`FlashError::ArithmeticOverflow`] if the fyToken reserve overflows,
///   the exponent is not positive or a value leaves the fixed-point range.
pub fn base_out_for_yield_in(
    base_reserve: Amount,
    yield_reserve: Amount,
    yield_in: Amount,
    seconds_to_maturity: u64,
    time_scale: U64F64,
    g: U64F64,
) -> Result<Amount> {
    let a = exponent(seconds_to_maturity, time_scale, g)?;
    if yield_in.is_zero() {
        return Ok(Amount::ZERO);
    }
    let yield_after = yield_reserve
        .checked_add(&yield_in)
        .ok_or(FlashError::ArithmeticOverflow("fyToken reserve after trade"))?;

    let sum = remaining_sum(invariant(base_reserve, yield_reserve, a)?, raise(yield_after, a)?)?;
    let base_after = to_amount(root(sum, a)?, Rounding::Up)?;
    base_reserve
        .checked_sub(&base_after)
        .ok_or(FlashError::Underflow("rounding induced error"))
}

/// Curve exponent `a = 1 - g·k·t`.
///
/// # Errors
///
/// - [`FlashError::PastMaturity`] if `seconds_to_maturity` is zero.
/// - [`FlashError::ArithmeticOverflow`] if `a` is not strictly positive
///   (too far from maturity for this time scale and fee).
pub fn exponent(seconds_to_maturity: u64, time_scale: U64F64, g: U64F64) -> Result<U64F64> {
    if seconds_to_maturity == 0 {
        return Err(FlashError::PastMaturity);
    }
    let t = time_scale
        .checked_mul(U64F64::from_num(seconds_to_maturity))
        .ok_or(FlashError::ArithmeticOverflow("k·t"))?;
    let gt = g
        .checked_mul(t)
        .ok_or(FlashError::ArithmeticOverflow("g·k·t"))?;
    match U64F64::ONE.checked_sub(gt) {
        Some(a) if a > U64F64::ZERO => Ok(a),
        _ => Err(FlashError::ArithmeticOverflow("too far from maturity")),
    }
}

/// `x^a` in Q.64.
fn raise(x: Amount, a: U64F64) -> Result<U256> {
    fixed_exp::pow(from_amount(x), a.to_bits(), ONE_BITS)
}

/// `s^(1/a)` in Q.64.
fn root(s: U256, a: U64F64) -> Result<U256> {
    fixed_exp::pow(s, ONE_BITS, a.to_bits())
}

/// `x^a + y^a`.  Each power is below 2^193, so the sum cannot overflow.
fn invariant(base_reserve: Amount, yield_reserve: Amount, a: U64F64) -> Result<U256> {
    Ok(raise(base_reserve, a)? + raise(yield_reserve, a)?)
}

/// What is left of the invariant once one side grows to `grown`.
fn remaining_sum(invariant: U256, grown: U256) -> Result<U256> {
    match invariant.checked_sub(grown) {
        Some(rest) if rest > U256::ZERO => Ok(rest),
        _ => Err(FlashError::InsufficientReserves("trade would drain the other reserve")),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const YEAR: u64 = 31_536_000;
    const FOUR_YEARS: u128 = 126_144_000;

    fn k() -> U64F64 {
        U64F64::from_bits(ONE_BITS / FOUR_YEARS)
    }

    fn g1() -> U64F64 {
        U64F64::from_bits((950u128 << 64) / 1000)
    }

    fn g2() -> U64F64 {
        U64F64::from_bits((1000u128 << 64) / 950)
    }

    fn amt(v: u128) -> Amount {
        Amount::new(v)
    }

    // -- exponent -----------------------------------------------------------

    #[test]
    fn exponent_shrinks_with_time() {
        let Ok(near) = exponent(60, k(), g1()) else {
            panic!("valid exponent");
        };
        let Ok(far) = exponent(YEAR, k(), g1()) else {
            panic!("valid exponent");
        };
        assert!(far < near);
        assert!(near < U64F64::ONE);
    }

    #[test]
    fn exponent_at_maturity_fails() {
        assert_eq!(exponent(0, k(), g1()), Err(FlashError::PastMaturity));
    }

    #[test]
    fn exponent_too_far_from_maturity() {
        // g2·k·t > 1 once t approaches four years.
        let Err(FlashError::ArithmeticOverflow(_)) = exponent(4 * YEAR, k(), g2()) else {
            panic!("expected ArithmeticOverflow");
        };
    }

    // -- base_in_for_yield_out ---------------------------------------------

    #[test]
    fn buying_fy_token_costs_less_than_face_value() {
        let Ok(cost) = base_in_for_yield_out(amt(1_000_000), amt(1_100_000), amt(1_000), YEAR, k(), g1())
        else {
            panic!("expected Ok");
        };
        // fyToken trades at a discount while yield_reserve > base_reserve.
        assert!(cost.get() > 0);
        assert!(cost.get() < 1_000);
    }

    #[test]
    fn base_in_zero_trade_is_free() {
        assert_eq!(
            base_in_for_yield_out(amt(1_000), amt(1_000), Amount::ZERO, YEAR, k(), g1()),
            Ok(Amount::ZERO)
        );
    }

    #[test]
    fn base_in_rejects_overdraw() {
        let err = base_in_for_yield_out(amt(1_000), amt(1_000), amt(1_001), YEAR, k(), g1());
        let Err(FlashError::InsufficientReserves(_)) = err else {
            panic!("expected InsufficientReserves");
        };
    }

    #[test]
    fn base_in_past_maturity() {
        assert_eq!(
            base_in_for_yield_out(amt(1_000), amt(1_000), amt(1), 0, k(), g1()),
            Err(FlashError::PastMaturity)
        );
    }

    // -- yield_in_for_base_out ---------------------------------------------

    #[test]
    fn buying_base_costs_more_fy_token() {
        let Ok(cost) = yield_in_for_base_out(amt(1_000_000), amt(1_100_000), amt(10_000), YEAR, k(), g2())
        else {
            panic!("expected Ok");
        };
        assert!(cost.get() > 10_000);
    }

    #[test]
    fn whole_base_reserve_can_be_bought() {
        let res = yield_in_for_base_out(amt(1_000_000), amt(1_100_000), amt(1_000_000), YEAR, k(), g2());
        assert!(res.is_ok());
    }

    #[test]
    fn one_more_than_base_reserve_fails() {
        let err = yield_in_for_base_out(amt(1_000_000), amt(1_100_000), amt(1_000_001), YEAR, k(), g2());
        let Err(FlashError::InsufficientReserves(_)) = err else {
            panic!("expected InsufficientReserves");
        };
    }

    // -- sell directions ---------------------------------------------------

    #[test]
    fn selling_base_yields_more_fy_token() {
        let Ok(out) = yield_out_for_base_in(amt(1_000_000), amt(1_100_000), amt(10_000), YEAR, k(), g1())
        else {
            panic!("expected Ok");
        };
        assert!(out.get() > 10_000);
    }

    #[test]
    fn selling_fy_token_yields_less_base() {
        let Ok(out) = base_out_for_yield_in(amt(1_000_000), amt(1_100_000), amt(10_000), YEAR, k(), g2())
        else {
            panic!("expected Ok");
        };
        assert!(out.get() < 10_000);
        assert!(out.get() > 0);
    }

    #[test]
    fn exact_out_and_exact_in_agree() {
        // Paying the quoted base for an exact fyToken amount must buy at
        // least that amount when sold back through the exact-in formula.
        let (b, y, dy) = (amt(5_000_000), amt(5_500_000), amt(25_000));
        let Ok(base_in) = base_in_for_yield_out(b, y, dy, YEAR, k(), g1()) else {
            panic!("expected Ok");
        };
        let Ok(got) = yield_out_for_base_in(b, y, base_in, YEAR, k(), g1()) else {
            panic!("expected Ok");
        };
        assert!(got >= dy, "got={got} wanted={dy}");
        assert!(got.get() <= dy.get() + 2);
    }

    #[test]
    fn results_are_deterministic() {
        let a = base_in_for_yield_out(amt(990_000), amt(1_110_280), amt(10_280), YEAR, k(), g1());
        let b = base_in_for_yield_out(amt(990_000), amt(1_110_280), amt(10_280), YEAR, k(), g1());
        assert_eq!(a, b);
    }

    #[test]
    fn large_reserves_do_not_overflow() {
        let big = amt(1u128 << 100);
        let res = base_in_for_yield_out(big, big, amt(1u128 << 90), YEAR, k(), g1());
        assert!(res.is_ok());
    }
}
