use std::sync::Arc;

use sqlx::PgPool;

use ledgerly_core::{AccountId, MovementId};
use ledgerly_infra::{
    InMemoryAccountDirectory, InMemoryLedgerStore, LedgerService, PostgresAccountDirectory,
    PostgresLedgerStore, RecordMovement, StatementError, StoreError, TransferFunds,
    config::StorageBackend,
};
use ledgerly_statements::{Movement, Statement};

type InMemoryLedger = LedgerService<Arc<InMemoryLedgerStore>, Arc<InMemoryAccountDirectory>>;
type PersistentLedger = LedgerService<Arc<PostgresLedgerStore>, Arc<PostgresAccountDirectory>>;

/// Ledger service wired to one of the storage backends.
#[derive(Clone)]
pub enum AppServices {
    InMemory {
        ledger: Arc<InMemoryLedger>,
    },
    Persistent {
        ledger: Arc<PersistentLedger>,
    },
}

pub async fn build_services(
    storage: &StorageBackend,
    seed_accounts: &[AccountId],
) -> Result<AppServices, StoreError> {
    match storage {
        StorageBackend::InMemory => Ok(build_in_memory_services(seed_accounts.iter().copied())),
        StorageBackend::Postgres { database_url } => {
            if !seed_accounts.is_empty() {
                tracing::warn!("LEDGERLY_ACCOUNTS ignored: accounts come from the users table");
            }
            build_persistent_services(database_url).await
        }
    }
}

/// In-memory wiring (dev/test): store + directory pre-populated with `accounts`.
pub fn build_in_memory_services(accounts: impl IntoIterator<Item = AccountId>) -> AppServices {
    let store = Arc::new(InMemoryLedgerStore::new());
    let directory = Arc::new(InMemoryAccountDirectory::with_accounts(accounts));
    let ledger = Arc::new(LedgerService::new(store, directory));

    AppServices::InMemory { ledger }
}

async fn build_persistent_services(database_url: &str) -> Result<AppServices, StoreError> {
    let pool = PgPool::connect(database_url)
        .await
        .map_err(|e| StoreError::Backend(format!("failed to connect to Postgres: {e}")))?;

    let store = Arc::new(PostgresLedgerStore::new(pool.clone()));
    store.ensure_schema().await?;
    let directory = Arc::new(PostgresAccountDirectory::new(pool));

    tracing::info!("using Postgres ledger store");
    Ok(AppServices::Persistent {
        ledger: Arc::new(LedgerService::new(store, directory)),
    })
}

impl AppServices {
    pub async fn record_movement(&self, cmd: RecordMovement) -> Result<Movement, StatementError> {
        match self {
            AppServices::InMemory { ledger } => ledger.record_movement(cmd).await,
            AppServices::Persistent { ledger } => ledger.record_movement(cmd).await,
        }
    }

    pub async fn transfer(&self, cmd: TransferFunds) -> Result<Movement, StatementError> {
        match self {
            AppServices::InMemory { ledger } => ledger.transfer(cmd).await,
            AppServices::Persistent { ledger } => ledger.transfer(cmd).await,
        }
    }

    pub async fn get_balance(&self, account: AccountId) -> Result<Statement, StatementError> {
        match self {
            AppServices::InMemory { ledger } => ledger.get_balance(account).await,
            AppServices::Persistent { ledger } => ledger.get_balance(account).await,
        }
    }

    pub async fn get_statement(
        &self,
        account: AccountId,
        id: MovementId,
    ) -> Result<Movement, StatementError> {
        match self {
            AppServices::InMemory { ledger } => ledger.get_statement(account, id).await,
            AppServices::Persistent { ledger } => ledger.get_statement(account, id).await,
        }
    }
}
