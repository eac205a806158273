use std::collections::HashMap;
use std::sync::RwLock;

use ledgerly_core::{AccountId, MovementId};
use ledgerly_statements::{Movement, MovementKind};

use super::r#trait::{LedgerStore, StoreError};

#[derive(Debug, Default)]
struct Log {
    rows: Vec<Movement>,
    by_id: HashMap<MovementId, usize>,
}

/// In-memory append-only movement store.
///
/// Intended for tests/dev. Lookups scan the whole log.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    log: RwLock<Log>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored rows across all accounts.
    pub fn len(&self) -> usize {
        self.log.read().map(|log| log.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select(&self, keep: impl Fn(&Movement) -> bool) -> Result<Vec<Movement>, StoreError> {
        let log = self
            .log
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(log.rows.iter().filter(|m| keep(m)).cloned().collect())
    }
}

#[async_trait::async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn append(&self, movement: Movement) -> Result<Movement, StoreError> {
        let mut log = self
            .log
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let id = movement.movement_id();
        if log.by_id.contains_key(&id) {
            return Err(StoreError::Duplicate(id.to_string()));
        }

        let position = log.rows.len();
        log.rows.push(movement.clone());
        log.by_id.insert(id, position);
        Ok(movement)
    }

    async fn list_by_owner(&self, account: AccountId) -> Result<Vec<Movement>, StoreError> {
        self.select(|m| m.owner_account_id() == account)
    }

    async fn list_by_counterparty(&self, account: AccountId) -> Result<Vec<Movement>, StoreError> {
        self.select(|m| {
            m.kind() == MovementKind::Transfer && m.counterparty_account_id() == Some(account)
        })
    }

    async fn get(&self, id: MovementId) -> Result<Option<Movement>, StoreError> {
        let log = self
            .log
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(log.by_id.get(&id).map(|&idx| log.rows[idx].clone()))
    }
}
