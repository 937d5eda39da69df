//! # YieldSpace Flash
//!
//! Flash loans of a base asset synthesised from a flash-minted fyToken and
//! a YieldSpace pool.
//!
//! A fyToken is a zero-coupon claim on the base asset at maturity.  Its
//! issuer can mint it on credit for the span of one call; a YieldSpace
//! pool prices it against the base asset.  Chaining the two lets a lender
//! with no capital of its own lend the pool's base asset:
//!
//! - mint fyToken on credit and sell it to the pool for `amount` base,
//! - hand `amount` to the borrower and take `amount + fee` back,
//! - buy the fyToken back and let the issuer retire it.
//!
//! The fee is the cost of that round trip through the curve.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `simulation` | yes | In-memory [`YieldSpacePool`](pools::YieldSpacePool) and [`FyToken`](tokens::FyToken) |
//!
//! # Quick Start
//!
//! ```rust
//! use yieldspace_flash::config::{CurveConfig, FyTokenConfig, LenderConfig, YieldSpaceConfig};
//! use yieldspace_flash::domain::{Address, Amount, Timestamp};
//! use yieldspace_flash::lenders::PoolFlashLender;
//! use yieldspace_flash::pools::YieldSpacePool;
//! use yieldspace_flash::runtime::Runtime;
//! use yieldspace_flash::tokens::FyToken;
//! use yieldspace_flash::traits::{FlashLender, YieldPool};
//!
//! let base = Address::repeat(0xba);
//! let pool_addr = Address::repeat(0x9a);
//!
//! // 1. A fyToken maturing in one year and a pool trading it
//! let fy_cfg = FyTokenConfig::new(Address::repeat(0xf1), base, Timestamp::new(31_536_000))
//!     .expect("valid fyToken");
//! let pool_cfg = YieldSpaceConfig::new(pool_addr, base, CurveConfig::default())
//!     .expect("valid pool");
//! let pool = YieldSpacePool::new(pool_cfg, FyToken::new(fy_cfg).expect("fyToken"))
//!     .expect("pool");
//!
//! // 2. Seed the pool and bind a lender to it
//! let mut rt = Runtime::new(Timestamp::new(0));
//! let lender_cfg = LenderConfig::new(Address::repeat(1), Address::repeat(2), CurveConfig::default())
//!     .expect("valid lender");
//! let lender = rt
//!     .execute(|ctx| {
//!         ctx.ledger_mut().mint(base, pool_addr, Amount::new(1_000_000))?;
//!         pool.yield_token().mint(ctx, pool_addr, Amount::new(1_100_000))?;
//!         PoolFlashLender::with_pool(lender_cfg, ctx, pool.clone())
//!     })
//!     .expect("lender bound");
//!
//! // 3. Quote a loan
//! let fee = lender.flash_fee(rt.context(), base, Amount::new(10_000)).expect("quote");
//! assert!(fee > Amount::ZERO && fee < Amount::new(50));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Borrower    │  FlashBorrower::on_flash_loan
//! └──────▲───────┘
//!        │ amount, fee
//! ┌──────┴───────┐   mint_on_credit   ┌──────────────┐
//! │    Lender     │ ─────────────────▶ │    Issuer     │
//! │ (state machine)│ ◀───────────────── │  (fyToken)    │
//! └──────┬───────┘  on_credit_issued  └──────────────┘
//!        │ buy_base_asset / buy_yield_token
//!        ▼
//! ┌──────────────┐
//! │     Pool      │  CurveParams + math::yield_math
//! └──────────────┘
//!
//! all balances, allowances and time: runtime::Context
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`Address`](domain::Address), [`LoanContext`](domain::LoanContext), etc. |
//! | [`math`] | Fixed-point `log2`/`exp2`/`pow` and the YieldSpace pricing functions |
//! | [`config`] | Serde-loadable configuration and [`CurveParams`](config::CurveParams) |
//! | [`traits`] | Collaborator seams: [`YieldPool`](traits::YieldPool), [`CreditIssuer`](traits::CreditIssuer), [`FlashBorrower`](traits::FlashBorrower), [`FlashLender`](traits::FlashLender) |
//! | [`lenders`] | [`PoolFlashLender`](lenders::PoolFlashLender) and [`DirectFlashLender`](lenders::DirectFlashLender) |
//! | [`runtime`] | Ledger, clock and all-or-nothing [`Runtime::execute`](runtime::Runtime::execute) |
//! | [`pools`] | Feature-gated in-memory YieldSpace pool |
//! | [`tokens`] | Feature-gated in-memory fyToken |
//! | [`error`] | [`FlashError`](error::FlashError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod domain;
pub mod error;
pub mod lenders;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod runtime;
pub mod tokens;
pub mod traits;
