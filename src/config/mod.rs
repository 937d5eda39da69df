//! Declarative configuration for the curve, the lender and the reference
//! collaborators.
//!
//! Every struct derives `serde` traits, validates on construction and
//! exposes a `validate` method for values that were deserialized directly.
//! [`CurveConfig::params`] is the only path from configuration to the
//! fixed-point [`CurveParams`] used for pricing.

mod curve;
mod fy_token_config;
mod lender_config;
mod yield_space_config;

pub use curve::{CurveConfig, CurveParams, FOUR_YEARS_SECONDS};
pub use fy_token_config::{FyTokenConfig, DEFAULT_SUPPLY_CEILING};
pub use lender_config::LenderConfig;
pub use yield_space_config::YieldSpaceConfig;
