//! Ledger use cases.
//!
//! `LedgerService` composes the store, the account directory and the
//! per-account locks. Every operation validates input, resolves accounts,
//! asks the [`BalanceEngine`] for balances and only then appends. Nothing
//! here computes a balance itself.
//!
//! ```text
//! input ─▶ validate ─▶ resolve account ─▶ (debit: lock, balance check) ─▶ append
//! ```

mod error;
mod movements;
mod queries;
mod transfer;

pub use error::{ErrorCategory, StatementError};
pub use movements::RecordMovement;
pub use transfer::TransferFunds;

use crate::balance_engine::BalanceEngine;
use crate::directory::AccountDirectory;
use crate::ledger_store::LedgerStore;
use crate::locks::AccountLocks;

/// Application service for deposits, withdrawals, transfers and lookups.
#[derive(Debug)]
pub struct LedgerService<S, D> {
    engine: BalanceEngine<S>,
    directory: D,
    locks: AccountLocks,
}

impl<S, D> LedgerService<S, D>
where
    S: LedgerStore,
    D: AccountDirectory,
{
    pub fn new(store: S, directory: D) -> Self {
        Self {
            engine: BalanceEngine::new(store),
            directory,
            locks: AccountLocks::new(),
        }
    }

    pub fn engine(&self) -> &BalanceEngine<S> {
        &self.engine
    }
}

/// Log a use-case failure at a level matching its category.
fn log_failure(err: &StatementError) {
    match err.category() {
        ErrorCategory::Internal => tracing::error!(error = %err, "ledger operation failed"),
        ErrorCategory::Rejected => tracing::warn!(error = %err, "ledger operation rejected"),
        ErrorCategory::NotFound | ErrorCategory::Invalid => {
            tracing::info!(error = %err, "ledger operation refused")
        }
    }
}
