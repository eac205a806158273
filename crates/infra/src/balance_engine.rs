//! Read-only balance derivation over a [`LedgerStore`].
//!
//! The engine never writes and keeps no state between calls. It does not
//! check that the account exists: an unknown account simply has no rows.

use rust_decimal::Decimal;

use ledgerly_core::{AccountId, DomainError};
use ledgerly_statements::{Movement, Statement, fold_balance};

use crate::ledger_store::{LedgerStore, StoreError};

#[derive(Debug, Clone)]
pub struct BalanceEngine<S> {
    store: S,
}

impl<S> BalanceEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: LedgerStore> BalanceEngine<S> {
    /// Current balance of `account`.
    pub async fn balance(&self, account: AccountId) -> Result<Decimal, StoreError> {
        let (owned, paid) = self.load(account).await?;
        fold_balance(account, &owned, &paid).map_err(|e| unfoldable(account, e))
    }

    /// Balance plus the direction-annotated history it was derived from.
    pub async fn statement(&self, account: AccountId) -> Result<Statement, StoreError> {
        let (owned, paid) = self.load(account).await?;
        Statement::build(account, owned, paid).map_err(|e| unfoldable(account, e))
    }

    /// Records filed under `account`, oldest first.
    pub async fn owned_history(&self, account: AccountId) -> Result<Vec<Movement>, StoreError> {
        let mut owned = self.store.list_by_owner(account).await?;
        sort_by_creation(&mut owned);
        Ok(owned)
    }

    /// Transfers paid by `account`, oldest first.
    pub async fn sent_transfers(&self, account: AccountId) -> Result<Vec<Movement>, StoreError> {
        let mut paid = self.store.list_by_counterparty(account).await?;
        sort_by_creation(&mut paid);
        Ok(paid)
    }

    async fn load(&self, account: AccountId) -> Result<(Vec<Movement>, Vec<Movement>), StoreError> {
        let owned = self.store.list_by_owner(account).await?;
        let paid = self.store.list_by_counterparty(account).await?;
        Ok((owned, paid))
    }
}

/// Stored rows that cannot be summed can only come from outside the domain
/// constructors, so they are reported as corrupt data.
fn unfoldable(account: AccountId, err: DomainError) -> StoreError {
    StoreError::Corrupt(format!("history of account {account}: {err}"))
}

fn sort_by_creation(rows: &mut [Movement]) {
    rows.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.movement_id().cmp(&b.movement_id()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger_store::InMemoryLedgerStore;
    use chrono::Utc;
    use ledgerly_statements::{Amount, Description, Direction};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn amount(v: Decimal) -> Amount {
        Amount::new(v).unwrap()
    }

    fn text(s: &str) -> Description {
        Description::new(s).unwrap()
    }

    #[tokio::test]
    async fn unknown_account_has_zero_balance() {
        let engine = BalanceEngine::new(InMemoryLedgerStore::new());
        let statement = engine.statement(AccountId::new()).await.unwrap();
        assert_eq!(statement.balance, Decimal::ZERO);
        assert!(statement.is_empty());
    }

    #[tokio::test]
    async fn statement_reflects_both_sides_of_a_transfer() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let engine = BalanceEngine::new(Arc::clone(&store));
        let a = AccountId::new();
        let b = AccountId::new();
        let t0 = Utc::now();

        store
            .append(Movement::deposit(a, amount(dec!(4500)), text("Salario"), t0))
            .await
            .unwrap();
        store
            .append(Movement::transfer(
                b,
                a,
                amount(dec!(400)),
                text("Peça para notebook"),
                t0 + chrono::Duration::seconds(1),
            ))
            .await
            .unwrap();

        let a_view = engine.statement(a).await.unwrap();
        assert_eq!(a_view.balance, dec!(4100));
        assert_eq!(a_view.len(), 2);
        assert_eq!(a_view.entries[1].direction, Direction::Debit);

        assert_eq!(engine.balance(b).await.unwrap(), dec!(400));
        assert_eq!(engine.owned_history(a).await.unwrap().len(), 1);
        assert_eq!(engine.sent_transfers(a).await.unwrap().len(), 1);
        assert_eq!(engine.owned_history(b).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reading_twice_gives_the_same_answer() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let engine = BalanceEngine::new(Arc::clone(&store));
        let a = AccountId::new();
        store
            .append(Movement::deposit(a, amount(dec!(10)), text("d"), Utc::now()))
            .await
            .unwrap();

        let first = engine.statement(a).await.unwrap();
        let second = engine.statement(a).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }
}
