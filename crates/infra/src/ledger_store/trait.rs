use std::sync::Arc;

use thiserror::Error;

use ledgerly_core::{AccountId, MovementId};
use ledgerly_statements::Movement;

/// Storage failure.
///
/// Storage errors are infrastructure failures, distinct from the business
/// rejections raised by the use cases.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A record with the same id already exists.
    #[error("duplicate movement: {0}")]
    Duplicate(String),

    /// A persisted row could not be turned back into a valid movement.
    #[error("corrupt movement row: {0}")]
    Corrupt(String),

    /// The backend is unreachable or rejected the operation.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Append-only movement store.
///
/// Implementations must:
/// - make an appended record visible to every subsequent read (read-your-writes)
/// - persist each record atomically (fully written or not at all)
/// - return rows for an account in insertion order
#[async_trait::async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persist one record and return it as stored.
    async fn append(&self, movement: Movement) -> Result<Movement, StoreError>;

    /// Every record filed under `account` (deposits, withdrawals, received transfers).
    async fn list_by_owner(&self, account: AccountId) -> Result<Vec<Movement>, StoreError>;

    /// Transfers paid by `account`.
    async fn list_by_counterparty(&self, account: AccountId) -> Result<Vec<Movement>, StoreError>;

    async fn get(&self, id: MovementId) -> Result<Option<Movement>, StoreError>;
}

#[async_trait::async_trait]
impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    async fn append(&self, movement: Movement) -> Result<Movement, StoreError> {
        (**self).append(movement).await
    }

    async fn list_by_owner(&self, account: AccountId) -> Result<Vec<Movement>, StoreError> {
        (**self).list_by_owner(account).await
    }

    async fn list_by_counterparty(&self, account: AccountId) -> Result<Vec<Movement>, StoreError> {
        (**self).list_by_counterparty(account).await
    }

    async fn get(&self, id: MovementId) -> Result<Option<Movement>, StoreError> {
        (**self).get(id).await
    }
}
