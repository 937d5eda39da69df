//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use yieldspace_flash::prelude::*;
//! ```

pub use crate::config::{CurveConfig, CurveParams, FyTokenConfig, LenderConfig, YieldSpaceConfig};
pub use crate::domain::{Address, Amount, LoanContext, LoanState, PoolSnapshot, Rounding, Timestamp};
pub use crate::error::{FlashError, Result};
pub use crate::lenders::{DirectFlashLender, PoolFlashLender};
pub use crate::math::CheckedArithmetic;
pub use crate::runtime::{Context, Ledger, Runtime};
pub use crate::traits::{CreditCallback, CreditIssuer, FlashBorrower, FlashLender, YieldPool};

#[cfg(feature = "simulation")]
pub use crate::pools::YieldSpacePool;
#[cfg(feature = "simulation")]
pub use crate::tokens::FyToken;
