//! Reference pool implementation.
//!
//! [`YieldSpacePool`] is an in-memory pool that stores its reserves in the
//! host ledger and prices with the same curve math the lender quotes with.
//! It is available behind the `simulation` feature (on by default).
//!
//! | Feature | Pool | Style |
//! |---------|------|-------|
//! | `simulation` | [`YieldSpacePool`] | YieldSpace (`x^(1-gt) + y^(1-gt) = const`) |

#[cfg(feature = "simulation")]
mod yield_space;

#[cfg(feature = "simulation")]
pub use yield_space::YieldSpacePool;
