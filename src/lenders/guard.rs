//! Lifecycle tag shared by both lenders.

use core::cell::Cell;

use tracing::debug;

use crate::domain::LoanState;
use crate::error::{FlashError, Result};

/// Marks a lender busy for the duration of one loan.
///
/// Entering fails unless the lender is [`LoanState::Idle`]; dropping the
/// guard puts it back to `Idle` whether the loan succeeded or not.
pub(crate) struct LoanGuard<'a> {
    state: &'a Cell<LoanState>,
}

impl<'a> LoanGuard<'a> {
    pub(crate) fn enter(state: &'a Cell<LoanState>, first: LoanState) -> Result<Self> {
        if !state.get().is_idle() {
            debug!(state = %state.get(), "loan requested while busy");
            return Err(FlashError::ReentrancyDenied);
        }
        advance(state, first);
        Ok(Self { state })
    }
}

impl Drop for LoanGuard<'_> {
    fn drop(&mut self) {
        self.state.set(LoanState::Idle);
    }
}

/// Moves `state` to `next`.
pub(crate) fn advance(state: &Cell<LoanState>, next: LoanState) {
    debug!(from = %state.get(), to = %next, "loan state");
    state.set(next);
}
