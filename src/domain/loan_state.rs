//! Lifecycle tag of the pool-backed lender.

use core::fmt;

/// Where a lender is in the loan lifecycle.
///
/// ```text
/// Idle → Quoting → Issuing → Converting → BorrowerExecuting → Repaying → Idle
/// ```
///
/// Each stage is only reachable through the external call made by the
/// previous one.  A failure anywhere returns the lender to `Idle`; the host
/// rolls back every balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoanState {
    /// No loan in flight.
    #[default]
    Idle,
    /// Previewing the fyToken amount to mint.
    Quoting,
    /// Waiting for the issuer's mint-on-credit callback.
    Issuing,
    /// Selling the fresh fyToken to the pool for base asset.
    Converting,
    /// Inside the borrower's callback.
    BorrowerExecuting,
    /// Buying the fyToken back so the issuer can retire it.
    Repaying,
}

impl LoanState {
    /// Returns `true` when no loan is in flight.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for LoanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Quoting => "quoting",
            Self::Issuing => "issuing",
            Self::Converting => "converting",
            Self::BorrowerExecuting => "borrower-executing",
            Self::Repaying => "repaying",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert!(LoanState::default().is_idle());
        assert!(!LoanState::Issuing.is_idle());
    }

    #[test]
    fn display_names() {
        assert_eq!(LoanState::BorrowerExecuting.to_string(), "borrower-executing");
        assert_eq!(LoanState::Idle.to_string(), "idle");
    }
}
