//! Flash lenders.
//!
//! | Lender | Lends | Fee | Backing |
//! |--------|-------|-----|---------|
//! | [`PoolFlashLender`] | the pool's base asset | curve round trip | flash-minted fyToken sold into a [`YieldPool`](crate::traits::YieldPool) |
//! | [`DirectFlashLender`] | the fyToken | zero | the issuer's mint-on-credit alone |
//!
//! Both implement [`FlashLender`](crate::traits::FlashLender), refuse
//! re-entry while a loan is in flight and only accept the issuer callback
//! from their own issuer.

mod direct_lender;
mod guard;
mod pool_lender;

#[cfg(all(test, feature = "simulation"))]
mod proptest_properties;

pub use direct_lender::DirectFlashLender;
pub use pool_lender::PoolFlashLender;
