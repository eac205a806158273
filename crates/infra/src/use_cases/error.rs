use rust_decimal::Decimal;
use thiserror::Error;

use ledgerly_core::DomainError;

use crate::ledger_store::StoreError;

/// Coarse outcome class so a transport can pick a status without reading text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Rejected,
    Invalid,
    Internal,
}

/// Failure of a ledger use case.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatementError {
    /// The acting account is unknown to the directory.
    #[error("account not found")]
    AccountNotFound,

    /// The transfer target is unknown to the directory.
    #[error("receiver account not found")]
    ReceiverNotFound,

    /// No record with that id is visible to the requesting account.
    #[error("statement not found")]
    StatementNotFound,

    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Decimal, available: Decimal },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl StatementError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StatementError::AccountNotFound
            | StatementError::ReceiverNotFound
            | StatementError::StatementNotFound => ErrorCategory::NotFound,
            StatementError::InsufficientFunds { .. } => ErrorCategory::Rejected,
            StatementError::InvalidInput(_) => ErrorCategory::Invalid,
            StatementError::Store(_) => ErrorCategory::Internal,
        }
    }
}

impl From<DomainError> for StatementError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg)
            | DomainError::InvariantViolation(msg)
            | DomainError::InvalidId(msg) => StatementError::InvalidInput(msg),
        }
    }
}
