//! Unified error type for the flash-lending library.
//!
//! Every fallible operation in the crate returns [`FlashError`].  Errors are
//! never recovered locally: they propagate with `?` to the top-level call,
//! where the host ([`Runtime::execute`](crate::runtime::Runtime::execute))
//! discards every effect of the aborted operation.

use thiserror::Error;

/// Reasons an operation can be rejected.
///
/// Variants carrying a `&'static str` name the computation that failed so
/// that two overflows in different formulas can be told apart in logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlashError {
    /// The asset presented is not the one this lender lends.
    #[error("unsupported asset")]
    UnsupportedAsset,

    /// An entry point was invoked by a party that is not allowed to call it.
    #[error("unauthorized caller")]
    UnauthorizedCaller,

    /// A value left the 128-bit amount domain or the fixed-point range.
    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(&'static str),

    /// A subtraction would have produced a negative amount.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by a zero amount.
    #[error("division by zero")]
    DivisionByZero,

    /// The trade would drain a reserve or push the curve out of its domain.
    #[error("insufficient reserves: {0}")]
    InsufficientReserves(&'static str),

    /// The fyToken has matured; the curve is no longer defined.
    #[error("past maturity")]
    PastMaturity,

    /// A transfer or burn exceeds the holder's balance.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// A `transfer_from` exceeds the spender's allowance.
    #[error("insufficient allowance")]
    InsufficientAllowance,

    /// A flash loan was requested while another one is in flight.
    #[error("reentrancy denied")]
    ReentrancyDenied,

    /// The lender has no collateral pool bound yet.
    #[error("no collateral pool bound")]
    PoolNotSet,

    /// The loan bundle handed back by the issuer could not be decoded.
    #[error("malformed loan bundle")]
    MalformedBundle,

    /// The issuer callback arrived while no loan was being issued.
    #[error("callback out of sequence")]
    CallbackOutOfSequence,

    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A quantity argument is not acceptable (e.g. zero).
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// Minting would take the fyToken supply above its ceiling.
    #[error("supply ceiling exceeded")]
    SupplyCeilingExceeded,

    /// The borrower's callback rejected the loan.
    #[error("borrower failed: {0}")]
    BorrowerFailed(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, FlashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = FlashError::ArithmeticOverflow("sum of powers");
        assert_eq!(err.to_string(), "arithmetic overflow: sum of powers");
    }

    #[test]
    fn unit_variants_display() {
        assert_eq!(FlashError::UnsupportedAsset.to_string(), "unsupported asset");
        assert_eq!(FlashError::ReentrancyDenied.to_string(), "reentrancy denied");
    }

    #[test]
    fn errors_compare_by_value() {
        assert_eq!(FlashError::PastMaturity, FlashError::PastMaturity);
        assert_ne!(
            FlashError::InsufficientReserves("a"),
            FlashError::InsufficientReserves("b")
        );
    }
}
