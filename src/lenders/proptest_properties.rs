//! Property-based tests using `proptest` for lender and curve invariants.
//!
//! 1. **Round trip**: buying fyToken and buying the base back recovers the
//!    fyToken amount within rounding when trades are free.
//! 2. **No free lunch**: with the trade fee the same round trip never
//!    returns more than it cost.
//! 3. **Fee monotonicity**: larger loans never cost less (one unit of
//!    rounding aside).
//! 4. **Quote consistency**: the fee quoted before a loan is the fee the
//!    borrower is charged.
//! 5. **Supply ceiling**: borrowing exactly `flash_supply` succeeds
//!    whenever it can be quoted, and one unit more always fails.
//! 6. **Callback authentication**: only the issuer may call back.
//! 7. **Unsupported asset**: rejected without touching any state.

#![allow(clippy::panic)]

use core::cell::Cell;

use fixed::types::U64F64;
use proptest::prelude::*;

use super::PoolFlashLender;
use crate::config::{CurveConfig, FyTokenConfig, LenderConfig, YieldSpaceConfig};
use crate::domain::{Address, Amount, Timestamp};
use crate::error::{FlashError, Result};
use crate::math::{self, CheckedArithmetic};
use crate::pools::YieldSpacePool;
use crate::runtime::Context;
use crate::tokens::FyToken;
use crate::traits::{CreditIssuer, FlashBorrower, FlashLender, YieldPool};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const BASE: Address = Address::repeat(0xba);
const FY: Address = Address::repeat(0xf1);
const POOL: Address = Address::repeat(0x9a);
const LENDER: Address = Address::repeat(0x1e);
const OWNER: Address = Address::repeat(0x0e);
const BORROWER: Address = Address::repeat(0xb0);
const DAY: u64 = 86_400;
const YEAR: u64 = 31_536_000;

type Pool = YieldSpacePool<FyToken>;

fn k() -> U64F64 {
    U64F64::from_bits((1u128 << 64) / u128::from(crate::config::FOUR_YEARS_SECONDS))
}

fn g1() -> U64F64 {
    U64F64::from_bits((950u128 << 64) / 1000)
}

fn g2() -> U64F64 {
    U64F64::from_bits((1000u128 << 64) / 950)
}

/// Pool seeded with `base` and `fy` reserves, maturing `ttm` seconds after
/// time zero, plus a lender bound to it.
fn market(base: u128, fy: u128, ttm: u64) -> (Context, Pool, PoolFlashLender<Pool>) {
    let Ok(fy_cfg) = FyTokenConfig::new(FY, BASE, Timestamp::new(ttm)) else {
        panic!("valid fyToken config");
    };
    let Ok(fy_token) = FyToken::new(fy_cfg) else {
        panic!("valid fyToken");
    };
    let Ok(pool_cfg) = YieldSpaceConfig::new(POOL, BASE, CurveConfig::default()) else {
        panic!("valid pool config");
    };
    let Ok(pool) = YieldSpacePool::new(pool_cfg, fy_token) else {
        panic!("valid pool");
    };
    let mut ctx = Context::new(Timestamp::new(0));
    let Ok(()) = ctx.ledger_mut().mint(BASE, POOL, Amount::new(base)) else {
        panic!("seed base");
    };
    let Ok(()) = pool.yield_token().mint(&mut ctx, POOL, Amount::new(fy)) else {
        panic!("seed fyToken");
    };
    let Ok(lender_cfg) = LenderConfig::new(OWNER, LENDER, CurveConfig::default()) else {
        panic!("valid lender config");
    };
    let Ok(lender) = PoolFlashLender::with_pool(lender_cfg, &mut ctx, pool.clone()) else {
        panic!("lender bound");
    };
    (ctx, pool, lender)
}

/// Repays `amount + fee` from its own balance and remembers the fee.
struct HonestBorrower {
    fee_seen: Cell<Option<Amount>>,
}

impl FlashBorrower for HonestBorrower {
    fn address(&self) -> Address {
        BORROWER
    }

    fn on_flash_loan(
        &self,
        ctx: &mut Context,
        lender: Address,
        _initiator: Address,
        asset: Address,
        amount: Amount,
        fee: Amount,
        _data: &[u8],
    ) -> Result<()> {
        self.fee_seen.set(Some(fee));
        ctx.ledger_mut()
            .transfer(asset, BORROWER, lender, amount.safe_add(&fee)?)
    }
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Base reserve in [10_000, 10_000_000].
fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=10_000_000u128
}

/// FyToken premium over the base reserve, in percent: [0, 50].
fn premium_strategy() -> impl Strategy<Value = u128> {
    0u128..=50u128
}

/// Seconds to maturity: one minute to three years.
fn ttm_strategy() -> impl Strategy<Value = u64> {
    60u64..=3 * YEAR
}

// ---------------------------------------------------------------------------
// Properties 1-2: curve round trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip_without_fee(
        base in reserve_strategy(),
        premium in premium_strategy(),
        ttm in ttm_strategy(),
        fraction in 1u128..=100u128,
    ) {
        let fy = base + base * premium / 100;
        let x = (base * fraction / 10_000).max(1);
        let Ok(base_in) = math::base_in_for_yield_out(
            Amount::new(base), Amount::new(fy), Amount::new(x), ttm, k(), U64F64::ONE,
        ) else {
            return Ok(());
        };
        let Ok(back) = math::yield_in_for_base_out(
            Amount::new(base + base_in.get()), Amount::new(fy - x), base_in, ttm, k(), U64F64::ONE,
        ) else {
            return Ok(());
        };
        prop_assert!(
            back.get().abs_diff(x) <= 2,
            "round trip drifted: x={} back={}", x, back
        );
    }

    #[test]
    fn prop_round_trip_with_fee_never_favours_trader(
        base in reserve_strategy(),
        premium in premium_strategy(),
        ttm in ttm_strategy(),
        fraction in 1u128..=100u128,
    ) {
        let fy = base + base * premium / 100;
        let x = (base * fraction / 10_000).max(1);
        let Ok(base_in) = math::base_in_for_yield_out(
            Amount::new(base), Amount::new(fy), Amount::new(x), ttm, k(), g1(),
        ) else {
            return Ok(());
        };
        // The pool refuses trades that leave fewer fyToken than base.
        if fy - x < base + base_in.get() {
            return Ok(());
        }
        let Ok(back) = math::yield_in_for_base_out(
            Amount::new(base + base_in.get()), Amount::new(fy - x), base_in, ttm, k(), g2(),
        ) else {
            return Ok(());
        };
        prop_assert!(
            back.get() >= x,
            "round trip favoured trader: paid {} fyToken, needs only {} back", x, back
        );
    }
}

// ---------------------------------------------------------------------------
// Properties 3-5: lender pricing
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_flash_fee_monotonic(
        base in reserve_strategy(),
        premium in 5u128..=50u128,
        ttm in DAY..=3 * YEAR,
        small in 1u128..=500u128,
        extra in 0u128..=500u128,
    ) {
        let (ctx, _pool, lender) = market(base, base + base * premium / 100, ttm);
        let a = (base * small / 10_000).max(1);
        let b = a + base * extra / 10_000;
        let Ok(fee_a) = lender.flash_fee(&ctx, BASE, Amount::new(a)) else {
            return Ok(());
        };
        let Ok(fee_b) = lender.flash_fee(&ctx, BASE, Amount::new(b)) else {
            return Ok(());
        };
        prop_assert!(
            fee_b.get() + 1 >= fee_a.get(),
            "fee fell: fee({})={} > fee({})={}", a, fee_a, b, fee_b
        );
    }

    #[test]
    fn prop_quoted_fee_is_charged(
        base in reserve_strategy(),
        premium in 5u128..=50u128,
        ttm in DAY..=3 * YEAR,
        fraction in 1u128..=200u128,
    ) {
        let (mut ctx, pool, lender) = market(base, base + base * premium / 100, ttm);
        let amount = Amount::new((base * fraction / 10_000).max(1));
        let Ok(quote) = lender.flash_fee(&ctx, BASE, amount) else {
            return Ok(());
        };
        let Ok(()) = ctx.ledger_mut().mint(BASE, BORROWER, quote) else {
            panic!("fund borrower");
        };
        let borrower = HonestBorrower { fee_seen: Cell::new(None) };
        let supply_before = pool.yield_token().total_supply(&ctx);
        let res = lender.flash_loan(&mut ctx, BORROWER, &borrower, BASE, amount, &[]);
        prop_assert!(res.is_ok(), "quoted {} but loan of {} failed: {:?}", quote, amount, res);
        prop_assert_eq!(borrower.fee_seen.get(), Some(quote));
        prop_assert_eq!(ctx.ledger().balance_of(BASE, BORROWER), Amount::ZERO);
        prop_assert_eq!(pool.yield_token().total_supply(&ctx), supply_before);
        prop_assert_eq!(ctx.ledger().balance_of(FY, LENDER), Amount::ZERO);
    }

    #[test]
    fn prop_whole_flash_supply_matches_quote(
        base in reserve_strategy(),
        premium in premium_strategy(),
        ttm in ttm_strategy(),
    ) {
        let (mut ctx, pool, lender) = market(base, base + base * premium / 100, ttm);
        let supply = lender.flash_supply(&ctx, BASE);
        let quote = lender.flash_fee(&ctx, BASE, supply);
        if let Ok(fee) = quote {
            let Ok(()) = ctx.ledger_mut().mint(BASE, BORROWER, fee) else {
                panic!("fund borrower");
            };
        }
        let borrower = HonestBorrower { fee_seen: Cell::new(None) };
        let res = lender.flash_loan(&mut ctx, BORROWER, &borrower, BASE, supply, &[]);
        match quote {
            Ok(fee) => {
                prop_assert_eq!(res, Ok(()));
                prop_assert_eq!(borrower.fee_seen.get(), Some(fee));
                prop_assert_eq!(pool.base_reserve(&ctx), Amount::new(base + fee.get()));
            }
            Err(err) => prop_assert_eq!(res, Err(err)),
        }
    }

    #[test]
    fn prop_cannot_borrow_beyond_flash_supply(
        base in reserve_strategy(),
        premium in premium_strategy(),
        ttm in ttm_strategy(),
    ) {
        let (mut ctx, _pool, lender) = market(base, base + base * premium / 100, ttm);
        let supply = lender.flash_supply(&ctx, BASE);
        prop_assert_eq!(supply, Amount::new(base));
        let borrower = HonestBorrower { fee_seen: Cell::new(None) };
        let res = lender.flash_loan(
            &mut ctx, BORROWER, &borrower, BASE, Amount::new(supply.get() + 1), &[],
        );
        let is_insufficient_reserves = matches!(res, Err(FlashError::InsufficientReserves(_)));
        prop_assert!(is_insufficient_reserves, "unexpected result {:?}", res);
        prop_assert_eq!(borrower.fee_seen.get(), None);
    }
}

// ---------------------------------------------------------------------------
// Properties 6-7: access control
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_only_issuer_may_call_back(
        caller in any::<[u8; 20]>(),
        yield_amount in any::<u128>(),
        bundle in proptest::collection::vec(any::<u8>(), 0..128),
    ) {
        let caller = Address::from_bytes(caller);
        prop_assume!(caller != FY);
        let (mut ctx, _pool, lender) = market(1_000_000, 1_100_000, YEAR);
        let borrower = HonestBorrower { fee_seen: Cell::new(None) };
        let before = ctx.clone();
        let res = lender.on_credit_issued(
            &mut ctx, &borrower, caller, Amount::new(yield_amount), &bundle,
        );
        prop_assert_eq!(res, Err(FlashError::UnauthorizedCaller));
        prop_assert_eq!(ctx, before);
    }

    #[test]
    fn prop_unsupported_asset_changes_nothing(
        asset in any::<[u8; 20]>(),
        amount in 1u128..=1_000_000u128,
    ) {
        let asset = Address::from_bytes(asset);
        prop_assume!(asset != BASE);
        let (mut ctx, _pool, lender) = market(1_000_000, 1_100_000, YEAR);
        let borrower = HonestBorrower { fee_seen: Cell::new(None) };
        let before = ctx.clone();
        prop_assert_eq!(
            lender.flash_fee(&ctx, asset, Amount::new(amount)),
            Err(FlashError::UnsupportedAsset)
        );
        let res = lender.flash_loan(&mut ctx, BORROWER, &borrower, asset, Amount::new(amount), &[]);
        prop_assert_eq!(res, Err(FlashError::UnsupportedAsset));
        prop_assert_eq!(ctx, before);
        prop_assert_eq!(borrower.fee_seen.get(), None);
    }
}
