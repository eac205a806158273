use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use ledgerly_core::AccountId;
use ledgerly_statements::{Amount, Description, Movement};

use super::{LedgerService, StatementError, log_failure};
use crate::directory::AccountDirectory;
use crate::ledger_store::LedgerStore;

/// Input of a peer-to-peer transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFunds {
    pub sender: AccountId,
    pub receiver: AccountId,
    pub amount: Decimal,
    pub description: String,
}

impl<S, D> LedgerService<S, D>
where
    S: LedgerStore,
    D: AccountDirectory,
{
    /// Move `amount` from `sender` to `receiver`.
    ///
    /// The sender's balance is checked before the receiver is resolved, so a
    /// broke sender learns about the shortfall even for an unknown receiver.
    /// Exactly one record is written, filed under the receiver.
    #[instrument(
        skip(self, cmd),
        fields(sender = %cmd.sender, receiver = %cmd.receiver, amount = %cmd.amount)
    )]
    pub async fn transfer(&self, cmd: TransferFunds) -> Result<Movement, StatementError> {
        let result = self.transfer_inner(cmd).await;
        if let Err(err) = &result {
            log_failure(err);
        }
        result
    }

    async fn transfer_inner(&self, cmd: TransferFunds) -> Result<Movement, StatementError> {
        let amount = Amount::new(cmd.amount)?;
        let description = Description::new(cmd.description)?;
        if cmd.sender == cmd.receiver {
            return Err(StatementError::InvalidInput(
                "cannot transfer to the paying account".to_string(),
            ));
        }

        let _guard = self.locks.acquire(cmd.sender).await;

        let available = self.engine.balance(cmd.sender).await?;
        if available < amount.value() {
            warn!(%available, "transfer exceeds sender balance");
            return Err(StatementError::InsufficientFunds {
                requested: amount.value(),
                available,
            });
        }

        if !self.directory.exists(cmd.receiver).await? {
            return Err(StatementError::ReceiverNotFound);
        }

        let movement = Movement::transfer(cmd.receiver, cmd.sender, amount, description, Utc::now());
        let stored = self.engine.store().append(movement).await?;

        info!(movement_id = %stored.movement_id(), "transfer recorded");
        Ok(stored)
    }
}
