//! Statements module (append-only movement log, derived balances).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod amount;
pub mod balance;
pub mod movement;

pub use amount::{Amount, Description};
pub use balance::{fold_balance, Direction, Statement, StatementEntry};
pub use movement::{Movement, MovementKind, MovementParts};
