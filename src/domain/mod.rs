//! Value types shared by the curve math, the lenders and the host.
//!
//! All types are small `Copy` newtypes or plain records; none of them
//! performs I/O or holds references to collaborators.

mod address;
mod amount;
mod loan_context;
mod loan_state;
mod pool_snapshot;
mod rounding;
mod timestamp;

pub use address::Address;
pub use amount::Amount;
pub use loan_context::LoanContext;
pub use loan_state::LoanState;
pub use pool_snapshot::PoolSnapshot;
pub use rounding::Rounding;
pub use timestamp::Timestamp;
