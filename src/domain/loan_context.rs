//! Typed record threaded through the issuer's mint-on-credit callback.

use borsh::{BorshDeserialize, BorshSerialize};

use super::{Address, Amount};
use crate::error::{FlashError, Result};

/// Everything the lender needs to resume a loan once the issuer calls back.
///
/// The issuer treats the bundle as opaque bytes, so the record is encoded
/// right before [`mint_on_credit`](crate::traits::CreditIssuer::mint_on_credit)
/// and decoded as the first step of the callback.  Nowhere else does the
/// crate handle it in encoded form.
///
/// # Examples
///
/// ```
/// use yieldspace_flash::domain::{Address, Amount, LoanContext};
///
/// let ctx = LoanContext::new(Address::repeat(1), Address::repeat(2), Amount::new(500), vec![9]);
/// let bytes = ctx.encode().expect("encodable");
/// assert_eq!(LoanContext::decode(&bytes), Ok(ctx));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct LoanContext {
    initiator: Address,
    receiver: Address,
    amount: Amount,
    data: Vec<u8>,
}

impl LoanContext {
    /// Creates a loan context.
    #[must_use]
    pub fn new(initiator: Address, receiver: Address, amount: Amount, data: Vec<u8>) -> Self {
        Self {
            initiator,
            receiver,
            amount,
            data,
        }
    }

    /// The party that called `flash_loan`.
    #[must_use]
    pub const fn initiator(&self) -> Address {
        self.initiator
    }

    /// The borrower whose callback receives the funds.
    #[must_use]
    pub const fn receiver(&self) -> Address {
        self.receiver
    }

    /// The amount lent, in units of the lent asset.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Borrower-supplied payload, passed through untouched.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Serialises the record for the callback boundary.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::MalformedBundle`] if serialisation fails.
    #[must_use = "this returns the encoded bundle and does not modify the context"]
    pub fn encode(&self) -> Result<Vec<u8>> {
        borsh::to_vec(self).map_err(|_| FlashError::MalformedBundle)
    }

    /// Restores a record produced by [`encode`](Self::encode).
    ///
    /// Trailing bytes are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::MalformedBundle`] on any decoding failure.
    #[must_use = "this returns the decoded context"]
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::try_from_slice(bytes).map_err(|_| FlashError::MalformedBundle)
    }
}
