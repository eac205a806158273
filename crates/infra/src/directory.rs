//! Account directory: answers whether an account exists.
//!
//! Accounts are created and owned by the user-management side of the service;
//! the ledger only needs an existence check.

use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use sqlx::PgPool;
use tracing::instrument;

use ledgerly_core::AccountId;

use crate::ledger_store::StoreError;
use crate::ledger_store::postgres::map_sqlx_error;

#[async_trait::async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn exists(&self, account: AccountId) -> Result<bool, StoreError>;
}

#[async_trait::async_trait]
impl<D> AccountDirectory for Arc<D>
where
    D: AccountDirectory + ?Sized,
{
    async fn exists(&self, account: AccountId) -> Result<bool, StoreError> {
        (**self).exists(account).await
    }
}

/// In-memory directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAccountDirectory {
    accounts: RwLock<HashSet<AccountId>>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            accounts: RwLock::new(accounts.into_iter().collect()),
        }
    }

    pub fn register(&self, account: AccountId) {
        self.write().insert(account);
    }

    pub fn remove(&self, account: AccountId) {
        self.write().remove(&account);
    }

    // A single insert or remove cannot leave the set half-updated, so a
    // poisoned lock is recovered rather than reported.
    fn write(&self) -> RwLockWriteGuard<'_, HashSet<AccountId>> {
        self.accounts.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl AccountDirectory for InMemoryAccountDirectory {
    async fn exists(&self, account: AccountId) -> Result<bool, StoreError> {
        let accounts = self.accounts.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(accounts.contains(&account))
    }
}

/// Directory backed by the `users` table maintained by user management.
#[derive(Debug, Clone)]
pub struct PostgresAccountDirectory {
    pool: Arc<PgPool>,
}

impl PostgresAccountDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl AccountDirectory for PostgresAccountDirectory {
    #[instrument(skip(self), fields(account_id = %account), err)]
    async fn exists(&self, account: AccountId) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM users WHERE id = $1")
            .bind(account.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("account_exists", e))?;
        Ok(row.is_some())
    }
}
