//! Deterministic base-2 logarithm and exponential over 256-bit fixed point.
//!
//! The YieldSpace invariant raises reserves to non-integer powers.  This
//! module evaluates `v^(num/den)` as `exp2(log2(v) · num / den)` using only
//! integer operations, so every caller that passes the same inputs gets the
//! same bits back.  The lender's quote and the pool's execution both go
//! through here; there is no second implementation to drift from.
//!
//! # Formats
//!
//! | Quantity | Representation |
//! |----------|----------------|
//! | values (reserves, powers) | `U256`, 64 fractional bits (Q.64) |
//! | logarithms | `i128`, 112 fractional bits (Q.112) |
//! | exponent ratio | two `u128`s, `num / den` |
//!
//! Keeping the exponent as a ratio lets `x^a` and `y^(1/a)` use exactly the
//! same `a` bits: `pow(v, a, ONE)` and `pow(v, ONE, a)`.
//!
//! # Precision
//!
//! `log2` is exact to 2⁻¹¹² before truncation of the mantissa; `exp2`
//! multiplies at most 112 factors each truncated at 2⁻¹²⁷.  The relative
//! error of `pow` stays far below one unit for any `u128` reserve.

use ethnum::U256;

use crate::domain::{Amount, Rounding};
use crate::error::{FlashError, Result};

/// Fractional bits of values handled by [`pow`].
pub const VALUE_FRACTION_BITS: u32 = 64;

/// Fractional bits of logarithms returned by [`log2`].
pub const LOG_FRACTION_BITS: u32 = 112;

/// `1.0` in Q.127, the working format of the `exp2` accumulator.
const Q127_ONE: u128 = 1 << 127;

/// `floor(2^(2^-k) · 2^127)` for `k = 1..=112`.
const EXP2_FACTORS: [u128; LOG_FRACTION_BITS as usize] = [
    0xb504f333f9de6484597d89b3754abe9f,
    0x9837f0518db8a96f46ad23182e42f6f6,
    0x8b95c1e3ea8bd6e6fbe4628758a53c90,
    0x85aac367cc487b14c5c95b8c2154c1b2,
    0x82cd8698ac2ba1d73e2a475b46520bff,
    0x8164d1f3bc0307737be56527bd14def4,
    0x80b1ed4fd999ab6c25335719b6e6fd20,
    0x8058d7d2d5e5f6b094d589f608ee4aa2,
    0x802c6436d0e04f50ff8ce94a6797b3ce,
    0x8016302f174676283690dfe44d11d008,
    0x800b179c82028fd0945e54e2ae18f2f0,
    0x80058baf7fee3b5d1c718b38e549cb93,
    0x8002c5d00fdcfcb6b6566a58c048be1f,
    0x800162e61bed4a48e84c2e1a463473d9,
    0x8000b17292f702a3aa22beacca949013,
    0x800058b92abbae02030c5fa5256f41fe,
    0x80002c5c8dade4d71776c0f4dbea67d6,
    0x8000162e44eaf636526be456600bdbe4,
    0x80000b1721fa7c188307016c1cd4e8b6,
    0x8000058b90de7e4cecfc487503488bb1,
    0x800002c5c8678f36cbfce50a6de60b14,
    0x80000162e431db9f80b2347b5d62e516,
    0x800000b1721872d0c7b08cf1e0114152,
    0x80000058b90c1aa8a5c3736cb77e8dff,
    0x8000002c5c8605a4635f2efc2362d978,
    0x800000162e4300e635cf4a109e3939bd,
    0x8000000b17217ff81bef9c551590cf83,
    0x800000058b90bfdd4e39cd52c0cfa27c,
    0x80000002c5c85fe6f72d669e0e76e411,
    0x8000000162e42ff18f9ad35186d0df28,
    0x80000000b17217f84cce71aa0dcfffe7,
    0x8000000058b90bfc07a77ad56ed22aaa,
    0x800000002c5c85fdfc23cdead40da8d6,
    0x80000000162e42fefc25eb1571853a66,
    0x800000000b17217f7d97f692baacded5,
    0x80000000058b90bfbead3b8b5dd254d7,
    0x8000000002c5c85fdf4eedd62f084e67,
    0x800000000162e42fefa58aef378bf586,
    0x8000000000b17217f7d24a78a3c7ef02,
    0x800000000058b90bfbe9067c93e474a6,
    0x80000000002c5c85fdf47b8e5a72599f,
    0x8000000000162e42fefa3bdb315934a2,
    0x80000000000b17217f7d1d7299b49c46,
    0x8000000000058b90bfbe8e9a8d1c4ea0,
    0x800000000002c5c85fdf4745969ea76f,
    0x80000000000162e42fefa3a0df5373bf,
    0x800000000000b17217f7d1cff4aac1e1,
    0x80000000000058b90bfbe8e7db95a2f1,
    0x8000000000002c5c85fdf473e61ae1f8,
    0x800000000000162e42fefa39f121751c,
    0x8000000000000b17217f7d1cf815bb96,
    0x800000000000058b90bfbe8e7bec1e0d,
    0x80000000000002c5c85fdf473dee5f17,
    0x8000000000000162e42fefa39ef5438f,
    0x80000000000000b17217f7d1cf7a26c8,
    0x8000000000000058b90bfbe8e7bcf4a4,
    0x800000000000002c5c85fdf473de72a2,
    0x80000000000000162e42fefa39ef3765,
    0x800000000000000b17217f7d1cf79b37,
    0x80000000000000058b90bfbe8e7bcd7d,
    0x8000000000000002c5c85fdf473de6b6,
    0x800000000000000162e42fefa39ef359,
    0x8000000000000000b17217f7d1cf79ac,
    0x800000000000000058b90bfbe8e7bcd6,
    0x80000000000000002c5c85fdf473de6a,
    0x8000000000000000162e42fefa39ef35,
    0x80000000000000000b17217f7d1cf79a,
    0x8000000000000000058b90bfbe8e7bcd,
    0x800000000000000002c5c85fdf473de6,
    0x80000000000000000162e42fefa39ef3,
    0x800000000000000000b17217f7d1cf79,
    0x80000000000000000058b90bfbe8e7bc,
    0x8000000000000000002c5c85fdf473de,
    0x800000000000000000162e42fefa39ef,
    0x8000000000000000000b17217f7d1cf7,
    0x800000000000000000058b90bfbe8e7b,
    0x80000000000000000002c5c85fdf473d,
    0x8000000000000000000162e42fefa39e,
    0x80000000000000000000b17217f7d1cf,
    0x8000000000000000000058b90bfbe8e7,
    0x800000000000000000002c5c85fdf473,
    0x80000000000000000000162e42fefa39,
    0x800000000000000000000b17217f7d1c,
    0x80000000000000000000058b90bfbe8e,
    0x8000000000000000000002c5c85fdf47,
    0x800000000000000000000162e42fefa3,
    0x8000000000000000000000b17217f7d1,
    0x800000000000000000000058b90bfbe8,
    0x80000000000000000000002c5c85fdf4,
    0x8000000000000000000000162e42fefa,
    0x80000000000000000000000b17217f7d,
    0x8000000000000000000000058b90bfbe,
    0x800000000000000000000002c5c85fdf,
    0x80000000000000000000000162e42fef,
    0x800000000000000000000000b17217f7,
    0x80000000000000000000000058b90bfb,
    0x8000000000000000000000002c5c85fd,
    0x800000000000000000000000162e42fe,
    0x8000000000000000000000000b17217f,
    0x800000000000000000000000058b90bf,
    0x80000000000000000000000002c5c85f,
    0x8000000000000000000000000162e42f,
    0x80000000000000000000000000b17217,
    0x8000000000000000000000000058b90b,
    0x800000000000000000000000002c5c85,
    0x80000000000000000000000000162e42,
    0x800000000000000000000000000b1721,
    0x80000000000000000000000000058b90,
    0x8000000000000000000000000002c5c8,
    0x800000000000000000000000000162e4,
    0x8000000000000000000000000000b172,
    0x800000000000000000000000000058b9,
];

/// Lifts an integer amount into Q.64.
#[must_use]
pub fn from_amount(amount: Amount) -> U256 {
    U256::from(amount.get()) << VALUE_FRACTION_BITS
}

/// Converts a Q.64 value back to an integer amount.
///
/// # Errors
///
/// Returns [`FlashError::ArithmeticOverflow`] if the integer part does not
/// fit in `u128`.
pub fn to_amount(value: U256, rounding: Rounding) -> Result<Amount> {
    let fraction_mask = (U256::ONE << VALUE_FRACTION_BITS) - U256::ONE;
    let has_fraction = (value & fraction_mask) != U256::ZERO;
    let (high, low) = (value >> VALUE_FRACTION_BITS).into_words();
    if high != 0 {
        return Err(FlashError::ArithmeticOverflow("fixed-point value exceeds u128"));
    }
    if rounding.is_up() && has_fraction {
        return low
            .checked_add(1)
            .map(Amount::new)
            .ok_or(FlashError::ArithmeticOverflow("fixed-point rounding exceeds u128"));
    }
    Ok(Amount::new(low))
}

/// Base-2 logarithm of a Q.64 value, returned in Q.112.
///
/// The integer part comes from the position of the most significant bit;
/// the fractional bits are extracted one at a time by squaring the
/// normalised mantissa and checking whether it crossed two.
///
/// # Errors
///
/// Returns [`FlashError::ArithmeticOverflow`] if `value` is zero.
pub fn log2(value: U256) -> Result<i128> {
    if value == U256::ZERO {
        return Err(FlashError::ArithmeticOverflow("log2 of zero"));
    }

    let msb = 255 - value.leading_zeros();
    let integer = i128::from(msb) - i128::from(VALUE_FRACTION_BITS);

    // Mantissa in [2^127, 2^128), i.e. [1, 2) in Q.127.
    let mut mantissa = if msb > 127 {
        value >> (msb - 127)
    } else {
        value << (127 - msb)
    };
    let two = U256::ONE << 128u32;

    let mut fraction: u128 = 0;
    for bit in (0..LOG_FRACTION_BITS).rev() {
        mantissa = (mantissa * mantissa) >> 127u32;
        if mantissa >= two {
            mantissa >>= 1u32;
            fraction |= 1u128 << bit;
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    let fraction = fraction as i128;
    Ok((integer << LOG_FRACTION_BITS) + fraction)
}

/// Two raised to a Q.112 power, returned in Q.64 (truncated).
///
/// Results smaller than 2⁻⁶⁴ truncate to zero.
///
/// # Errors
///
/// Returns [`FlashError::ArithmeticOverflow`] if the result needs more than
/// 256 bits.
pub fn exp2(exponent: i128) -> Result<U256> {
    let integer = exponent >> LOG_FRACTION_BITS;
    #[allow(clippy::cast_sign_loss)]
    let fraction = (exponent & ((1i128 << LOG_FRACTION_BITS) - 1)) as u128;

    let mut acc = U256::from(Q127_ONE);
    for (k, factor) in (0u32..).zip(EXP2_FACTORS.iter()) {
        if (fraction & (1u128 << (LOG_FRACTION_BITS - 1 - k))) != 0 {
            acc = (acc * U256::from(*factor)) >> 127u32;
        }
    }

    // acc / 2^127 lies in [1, 2); rescale to Q.64 and apply 2^integer.
    let shift = integer + i128::from(VALUE_FRACTION_BITS) - 127;
    if shift >= 0 {
        if shift > 128 {
            return Err(FlashError::ArithmeticOverflow("exp2 result exceeds 256 bits"));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        return Ok(acc << (shift as u32));
    }
    let right = shift.unsigned_abs();
    if right >= 256 {
        return Ok(U256::ZERO);
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(acc >> (right as u32))
}

/// Raises a Q.64 value to the power `num / den`.
///
/// `pow(0, num, den)` is zero for any positive exponent and `pow(v, 0, den)`
/// is one.
///
/// # Errors
///
/// - [`FlashError::DivisionByZero`] if `den` is zero.
/// - [`FlashError::ArithmeticOverflow`] if the result needs more than 256
///   bits.
pub fn pow(value: U256, num: u128, den: u128) -> Result<U256> {
    if den == 0 {
        return Err(FlashError::DivisionByZero);
    }
    if num == 0 {
        return Ok(U256::ONE << VALUE_FRACTION_BITS);
    }
    if value == U256::ZERO {
        return Ok(U256::ZERO);
    }

    let log = log2(value)?;
    // |log| < 2^120 and num < 2^128, so the product fits in 256 bits.
    let scaled = U256::from(log.unsigned_abs()) * U256::from(num) / U256::from(den);
    let (high, low) = scaled.into_words();
    let magnitude = if high == 0 { i128::try_from(low).ok() } else { None };

    match (log < 0, magnitude) {
        (false, Some(m)) => exp2(m),
        (true, Some(m)) => exp2(-m),
        (false, None) => Err(FlashError::ArithmeticOverflow("pow exponent out of range")),
        (true, None) => Ok(U256::ZERO),
    }
}
