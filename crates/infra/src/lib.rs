//! Infrastructure layer: movement storage, account directory, balance
//! derivation, use cases and configuration.

pub mod balance_engine;
pub mod config;
pub mod directory;
pub mod ledger_store;
pub mod locks;
pub mod use_cases;


pub use balance_engine::BalanceEngine;
pub use directory::{AccountDirectory, InMemoryAccountDirectory, PostgresAccountDirectory};
pub use ledger_store::{InMemoryLedgerStore, LedgerStore, PostgresLedgerStore, StoreError};
pub use locks::AccountLocks;
pub use use_cases::{ErrorCategory, LedgerService, RecordMovement, StatementError, TransferFunds};
