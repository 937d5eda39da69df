//! Seams between the lenders and their collaborators.
//!
//! The lenders depend on three external parties, each behind a trait:
//! a [`YieldPool`] that trades base asset against fyToken, a
//! [`CreditIssuer`] that flash-mints the fyToken and calls a
//! [`CreditCallback`] back, and the [`FlashBorrower`] that receives the
//! loan.  Both lenders implement [`FlashLender`].
//!
//! Implementors hold identities and configuration only; balances and time
//! are read from the [`Context`](crate::runtime::Context) passed to every
//! call.

mod credit_issuer;
mod flash_borrower;
mod flash_lender;
mod yield_pool;

pub use credit_issuer::{CreditCallback, CreditIssuer};
pub use flash_borrower::FlashBorrower;
pub use flash_lender::FlashLender;
pub use yield_pool::YieldPool;
pub(crate) use yield_pool::quote_buy_yield_token;
