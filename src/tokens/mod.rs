//! Reference fyToken issuer.
//!
//! [`FyToken`] flash-mints through
//! [`CreditIssuer::mint_on_credit`](crate::traits::CreditIssuer::mint_on_credit)
//! and is available behind the `simulation` feature (on by default).

#[cfg(feature = "simulation")]
mod fy_token;

#[cfg(feature = "simulation")]
pub use fy_token::FyToken;
