//! Append-only movement log.
//!
//! The store persists [`Movement`](ledgerly_statements::Movement) records and
//! answers the two lookups the balance fold needs: rows filed under an account
//! and transfers paid by it. Nothing here updates or deletes a row.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use postgres::PostgresLedgerStore;
pub use r#trait::{LedgerStore, StoreError};
