use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use ledgerly_core::AccountId;
use ledgerly_statements::{Amount, Description, Movement, MovementKind};

use super::{LedgerService, StatementError, log_failure};
use crate::directory::AccountDirectory;
use crate::ledger_store::LedgerStore;

/// Input of a deposit or withdrawal, as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMovement {
    pub account_id: AccountId,
    pub kind: MovementKind,
    pub amount: Decimal,
    pub description: String,
}

impl<S, D> LedgerService<S, D>
where
    S: LedgerStore,
    D: AccountDirectory,
{
    /// Append a deposit or withdrawal for `cmd.account_id`.
    ///
    /// A withdrawal holds the account's guard from the balance read until the
    /// append completes.
    #[instrument(
        skip(self, cmd),
        fields(account_id = %cmd.account_id, kind = %cmd.kind, amount = %cmd.amount)
    )]
    pub async fn record_movement(&self, cmd: RecordMovement) -> Result<Movement, StatementError> {
        let result = self.record_movement_inner(cmd).await;
        if let Err(err) = &result {
            log_failure(err);
        }
        result
    }

    pub async fn deposit(
        &self,
        account_id: AccountId,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<Movement, StatementError> {
        self.record_movement(RecordMovement {
            account_id,
            kind: MovementKind::Deposit,
            amount,
            description: description.into(),
        })
        .await
    }

    pub async fn withdraw(
        &self,
        account_id: AccountId,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<Movement, StatementError> {
        self.record_movement(RecordMovement {
            account_id,
            kind: MovementKind::Withdrawal,
            amount,
            description: description.into(),
        })
        .await
    }

    async fn record_movement_inner(&self, cmd: RecordMovement) -> Result<Movement, StatementError> {
        if cmd.kind == MovementKind::Transfer {
            return Err(StatementError::InvalidInput(
                "transfers must name a receiver".to_string(),
            ));
        }
        let amount = Amount::new(cmd.amount)?;
        let description = Description::new(cmd.description)?;
        let account = cmd.account_id;

        if !self.directory.exists(account).await? {
            return Err(StatementError::AccountNotFound);
        }

        let stored = match cmd.kind {
            MovementKind::Withdrawal => {
                let _guard = self.locks.acquire(account).await;

                let available = self.engine.balance(account).await?;
                if available < amount.value() {
                    warn!(%available, "withdrawal exceeds balance");
                    return Err(StatementError::InsufficientFunds {
                        requested: amount.value(),
                        available,
                    });
                }

                let movement = Movement::withdrawal(account, amount, description, Utc::now());
                self.engine.store().append(movement).await?
            }
            _ => {
                let movement = Movement::deposit(account, amount, description, Utc::now());
                self.engine.store().append(movement).await?
            }
        };

        info!(movement_id = %stored.movement_id(), "movement recorded");
        Ok(stored)
    }
}
