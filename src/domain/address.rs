//! Account and token identifiers.

use core::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// A 20-byte identifier naming an account, a contract, or a token.
///
/// Lenders, pools, issuers and borrowers are all addressed the same way;
/// a token's address is the address of its issuer.  All byte sequences are
/// valid, so construction is infallible.
///
/// # Examples
///
/// ```
/// use yieldspace_flash::domain::Address;
///
/// let addr = Address::from_bytes([7u8; 20]);
/// assert_eq!(addr.as_bytes(), [7u8; 20]);
/// assert!(!addr.is_zero());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address.  Never a valid lender, pool or token.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Shorthand for an address whose every byte is `byte`.
    ///
    /// Handy for fixtures: `Address::repeat(1)`, `Address::repeat(2)`, ...
    #[must_use]
    pub const fn repeat(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 20] {
        self.0
    }

    /// Returns `true` for [`Address::ZERO`].
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
