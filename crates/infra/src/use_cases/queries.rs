use tracing::instrument;

use ledgerly_core::{AccountId, MovementId};
use ledgerly_statements::{Movement, Statement};

use super::{LedgerService, StatementError, log_failure};
use crate::directory::AccountDirectory;
use crate::ledger_store::LedgerStore;

impl<S, D> LedgerService<S, D>
where
    S: LedgerStore,
    D: AccountDirectory,
{
    /// Balance and annotated history of an existing account.
    #[instrument(skip(self), fields(account_id = %account))]
    pub async fn get_balance(&self, account: AccountId) -> Result<Statement, StatementError> {
        let result = self.get_balance_inner(account).await;
        if let Err(err) = &result {
            log_failure(err);
        }
        result
    }

    /// A single record, visible only to the account that owns or paid it.
    #[instrument(skip(self), fields(account_id = %account, movement_id = %id))]
    pub async fn get_statement(
        &self,
        account: AccountId,
        id: MovementId,
    ) -> Result<Movement, StatementError> {
        let result = self.get_statement_inner(account, id).await;
        if let Err(err) = &result {
            log_failure(err);
        }
        result
    }

    async fn get_balance_inner(&self, account: AccountId) -> Result<Statement, StatementError> {
        if !self.directory.exists(account).await? {
            return Err(StatementError::AccountNotFound);
        }
        Ok(self.engine.statement(account).await?)
    }

    async fn get_statement_inner(
        &self,
        account: AccountId,
        id: MovementId,
    ) -> Result<Movement, StatementError> {
        if !self.directory.exists(account).await? {
            return Err(StatementError::AccountNotFound);
        }
        match self.engine.store().get(id).await? {
            Some(movement) if movement.involves(account) => Ok(movement),
            _ => Err(StatementError::StatementNotFound),
        }
    }
}
