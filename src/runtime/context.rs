//! Mutable host state threaded through every call.

use crate::domain::Timestamp;

use super::Ledger;

/// Everything a collaborator may read or change during one top-level
/// operation: token state and the current time.
///
/// Collaborators themselves hold only identities and configuration; all
/// mutable state lives here so the host can snapshot and restore it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    ledger: Ledger,
    now: Timestamp,
}

impl Context {
    /// Creates a context with an empty ledger at time `now`.
    #[must_use]
    pub fn new(now: Timestamp) -> Self {
        Self {
            ledger: Ledger::new(),
            now,
        }
    }

    /// Current block time.
    #[must_use]
    pub const fn now(&self) -> Timestamp {
        self.now
    }

    /// Read-only ledger.
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Mutable ledger.
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub(crate) fn set_now(&mut self, now: Timestamp) {
        self.now = now;
    }
}
