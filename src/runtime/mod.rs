//! In-memory host: ledger, clock and all-or-nothing execution.
//!
//! [`Runtime::execute`] runs one top-level operation against a
//! [`Context`].  If the operation returns `Err`, every ledger change it
//! made is discarded, which gives flash loans their atomicity: a borrower
//! that does not repay leaves no trace.

mod context;
mod ledger;

pub use context::Context;
pub use ledger::Ledger;

use tracing::warn;

use crate::domain::Timestamp;
use crate::error::Result;

/// Host that owns the [`Context`] and executes operations atomically.
///
/// # Examples
///
/// ```
/// use yieldspace_flash::domain::{Address, Amount, Timestamp};
/// use yieldspace_flash::error::FlashError;
/// use yieldspace_flash::runtime::Runtime;
///
/// let token = Address::repeat(9);
/// let alice = Address::repeat(1);
/// let mut runtime = Runtime::new(Timestamp::new(0));
///
/// let minted = runtime.execute(|ctx| ctx.ledger_mut().mint(token, alice, Amount::new(5)));
/// assert!(minted.is_ok());
///
/// let failed: Result<(), FlashError> = runtime.execute(|ctx| {
///     ctx.ledger_mut().mint(token, alice, Amount::new(5))?;
///     Err(FlashError::InsufficientBalance)
/// });
/// assert!(failed.is_err());
/// assert_eq!(runtime.context().ledger().balance_of(token, alice), Amount::new(5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Runtime {
    context: Context,
}

impl Runtime {
    /// Creates a runtime with an empty ledger at time `now`.
    #[must_use]
    pub fn new(now: Timestamp) -> Self {
        Self {
            context: Context::new(now),
        }
    }

    /// Read-only view of the host state.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Runs `operation`, keeping its effects only if it succeeds.
    ///
    /// # Errors
    ///
    /// Returns whatever `operation` returns; the context is then exactly
    /// as it was before the call.
    pub fn execute<T, F>(&mut self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut Context) -> Result<T>,
    {
        let checkpoint = self.context.clone();
        match operation(&mut self.context) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(error = %err, "operation aborted, state rolled back");
                self.context = checkpoint;
                Err(err)
            }
        }
    }

    /// Moves the clock to `now`.
    pub fn set_time(&mut self, now: Timestamp) {
        self.context.set_now(now);
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&mut self, seconds: u64) {
        let now = self.context.now().plus_seconds(seconds);
        self.context.set_now(now);
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Address, Amount};
    use crate::error::FlashError;

    const TOKEN: Address = Address::repeat(7);
    const ALICE: Address = Address::repeat(1);

    #[test]
    fn successful_operation_commits() {
        let mut rt = Runtime::new(Timestamp::new(10));
        let res = rt.execute(|ctx| ctx.ledger_mut().mint(TOKEN, ALICE, Amount::new(3)));
        assert!(res.is_ok());
        assert_eq!(rt.context().ledger().total_supply(TOKEN), Amount::new(3));
    }

    #[test]
    fn failed_operation_rolls_back_everything() {
        let mut rt = Runtime::new(Timestamp::new(10));
        let res: Result<()> = rt.execute(|ctx| {
            ctx.ledger_mut().mint(TOKEN, ALICE, Amount::new(3))?;
            ctx.ledger_mut().approve(TOKEN, ALICE, Address::repeat(2), Amount::MAX);
            ctx.ledger_mut().burn(TOKEN, ALICE, Amount::new(4))
        });
        assert_eq!(res, Err(FlashError::InsufficientBalance));
        assert_eq!(rt.context(), &Context::new(Timestamp::new(10)));
    }

    #[test]
    fn clock_moves() {
        let mut rt = Runtime::new(Timestamp::new(10));
        rt.advance(5);
        assert_eq!(rt.context().now(), Timestamp::new(15));
        rt.set_time(Timestamp::new(3));
        assert_eq!(rt.context().now(), Timestamp::new(3));
    }

    #[test]
    fn operation_sees_current_time() {
        let mut rt = Runtime::new(Timestamp::new(42));
        let Ok(now) = rt.execute(|ctx| Ok(ctx.now())) else {
            panic!("read succeeds");
        };
        assert_eq!(now, Timestamp::new(42));
    }
}
