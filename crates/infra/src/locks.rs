//! Per-account write serialization.
//!
//! Every debit runs "read balance, then append" while holding its account's
//! guard, so two debits against one account cannot both pass the sufficiency
//! check on the same balance. Guards for different accounts never contend.
//!
//! The guard is process-local: several service instances sharing one database
//! do not serialize against each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

use ledgerly_core::AccountId;

#[derive(Debug, Default)]
pub struct AccountLocks {
    slots: Mutex<HashMap<AccountId, Arc<tokio::sync::Mutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive write access to `account`.
    ///
    /// The guard is released on drop, including when the owning future is
    /// cancelled.
    pub async fn acquire(&self, account: AccountId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Forget slots nobody holds or waits on.
            slots.retain(|id, slot| *id == account || Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(account).or_default())
        };
        slot.lock_owned().await
    }

    /// Number of accounts with a live slot.
    pub fn tracked(&self) -> usize {
        self.slots
            .lock()
            .map(|slots| slots.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_account_is_exclusive() {
        let locks = Arc::new(AccountLocks::new());
        let a = AccountId::new();

        let guard = locks.acquire(a).await;
        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _g = locks.acquire(a).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_accounts_do_not_contend() {
        let locks = AccountLocks::new();
        let _a = locks.acquire(AccountId::new()).await;
        let _b = locks.acquire(AccountId::new()).await;
        assert_eq!(locks.tracked(), 2);
    }

    #[tokio::test]
    async fn idle_slots_are_pruned() {
        let locks = AccountLocks::new();
        for _ in 0..5 {
            let _g = locks.acquire(AccountId::new()).await;
        }
        assert_eq!(locks.tracked(), 1);
    }
}
