//! Postgres-backed movement store.
//!
//! Rows live in the `statements` table. A transfer is a single row filed under
//! the receiver (`user_id`) with the payer in `sender_id`.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Database (check constraint violation) | `23514` | `Corrupt` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / network / other | N/A | `Backend` |

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Row};
use std::sync::Arc;
use tracing::{Span, instrument};

use ledgerly_core::{AccountId, MovementId};
use ledgerly_statements::{Amount, Description, Movement, MovementParts};

use super::r#trait::{LedgerStore, StoreError};

const LEDGER_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS statements (
    id          UUID PRIMARY KEY,
    user_id     UUID NOT NULL,
    sender_id   UUID NULL,
    type        TEXT NOT NULL CHECK (type IN ('deposit', 'withdraw', 'transfer')),
    amount      NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
    description TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL,
    CHECK ((type = 'transfer') = (sender_id IS NOT NULL))
);
CREATE INDEX IF NOT EXISTS idx_statements_user ON statements(user_id, created_at);
CREATE INDEX IF NOT EXISTS idx_statements_sender ON statements(sender_id, created_at)
    WHERE sender_id IS NOT NULL;
"#;

/// Postgres-backed append-only movement store.
///
/// `append` is a single `INSERT`, so a row is either fully written or absent.
#[derive(Debug, Clone)]
pub struct PostgresLedgerStore {
    pool: Arc<PgPool>,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `statements` table and its indexes when missing.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(LEDGER_SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    async fn fetch_where(
        &self,
        operation: &'static str,
        column: &'static str,
        account: AccountId,
    ) -> Result<Vec<Movement>, StoreError> {
        let sql = format!(
            r#"
            SELECT id, user_id, sender_id, type, amount, description, created_at, updated_at
            FROM statements
            WHERE {column} = $1
            ORDER BY created_at ASC, id ASC
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(account.as_uuid())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?;

        let mut movements = Vec::with_capacity(rows.len());
        for row in rows {
            let row = MovementRow::from_row(&row)
                .map_err(|e| StoreError::Corrupt(format!("failed to read statement row: {e}")))?;
            movements.push(row.try_into()?);
        }

        Span::current().record("row_count", movements.len());
        Ok(movements)
    }
}

#[async_trait::async_trait]
impl LedgerStore for PostgresLedgerStore {
    #[instrument(
        skip(self, movement),
        fields(
            movement_id = %movement.movement_id(),
            owner = %movement.owner_account_id(),
            kind = %movement.kind()
        ),
        err
    )]
    async fn append(&self, movement: Movement) -> Result<Movement, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO statements (
                id,
                user_id,
                sender_id,
                type,
                amount,
                description,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(movement.movement_id().as_uuid())
        .bind(movement.owner_account_id().as_uuid())
        .bind(movement.counterparty_account_id().map(uuid::Uuid::from))
        .bind(movement.kind().as_str())
        .bind(movement.amount().value())
        .bind(movement.description().as_str())
        .bind(movement.created_at())
        .bind(movement.updated_at())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_statement", e))?;

        Ok(movement)
    }

    #[instrument(skip(self), fields(account_id = %account, row_count = tracing::field::Empty), err)]
    async fn list_by_owner(&self, account: AccountId) -> Result<Vec<Movement>, StoreError> {
        self.fetch_where("list_by_owner", "user_id", account).await
    }

    #[instrument(skip(self), fields(account_id = %account, row_count = tracing::field::Empty), err)]
    async fn list_by_counterparty(&self, account: AccountId) -> Result<Vec<Movement>, StoreError> {
        self.fetch_where("list_by_counterparty", "sender_id", account).await
    }

    #[instrument(skip(self), fields(movement_id = %id), err)]
    async fn get(&self, id: MovementId) -> Result<Option<Movement>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, sender_id, type, amount, description, created_at, updated_at
            FROM statements
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_statement", e))?;

        match row {
            Some(row) => {
                let row = MovementRow::from_row(&row)
                    .map_err(|e| StoreError::Corrupt(format!("failed to read statement row: {e}")))?;
                Ok(Some(row.try_into()?))
            }
            None => Ok(None),
        }
    }
}

/// Map SQLx errors to StoreError.
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Duplicate(msg),
                Some("23514") => StoreError::Corrupt(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {operation}"))
        }
        _ => StoreError::Backend(format!("sqlx error in {operation}: {err}")),
    }
}

// SQLx row types

#[derive(Debug)]
struct MovementRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    sender_id: Option<uuid::Uuid>,
    kind: String,
    amount: Decimal,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for MovementRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(MovementRow {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            sender_id: row.try_get("sender_id")?,
            kind: row.try_get("type")?,
            amount: row.try_get("amount")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<MovementRow> for Movement {
    type Error = StoreError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let corrupt = |e: ledgerly_core::DomainError| StoreError::Corrupt(format!("row {}: {e}", row.id));

        let parts = MovementParts {
            id: MovementId::from_uuid(row.id),
            owner_account_id: AccountId::from_uuid(row.user_id),
            counterparty_account_id: row.sender_id.map(AccountId::from_uuid),
            kind: row.kind.parse().map_err(corrupt)?,
            amount: Amount::new(row.amount).map_err(corrupt)?,
            description: Description::new(row.description.clone()).map_err(corrupt)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        Movement::restore(parts).map_err(corrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(kind: &str, sender: Option<uuid::Uuid>) -> MovementRow {
        let now = Utc::now();
        MovementRow {
            id: uuid::Uuid::now_v7(),
            user_id: uuid::Uuid::now_v7(),
            sender_id: sender,
            kind: kind.to_string(),
            amount: dec!(400.00),
            description: "Peça para notebook".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn transfer_row_maps_sender_to_counterparty() {
        let sender = uuid::Uuid::now_v7();
        let movement = Movement::try_from(row("transfer", Some(sender))).unwrap();
        assert_eq!(movement.counterparty_account_id(), Some(AccountId::from_uuid(sender)));
        assert_eq!(movement.amount().value(), dec!(400));
    }

    #[test]
    fn unknown_type_is_reported_as_corrupt() {
        let err = Movement::try_from(row("refund", None)).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn deposit_row_with_sender_is_rejected() {
        let err = Movement::try_from(row("deposit", Some(uuid::Uuid::now_v7()))).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
