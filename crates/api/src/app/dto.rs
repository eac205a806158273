use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerly_core::{AccountId, MovementId};
use ledgerly_statements::{Amount, Direction, Movement, Statement, StatementEntry};

// -------------------------
// Request DTOs
// -------------------------

/// Body of deposit, withdrawal and transfer requests. `amount` may be a JSON
/// number or a decimal string.
#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    pub amount: Decimal,
    pub description: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct MovementResponse {
    pub id: MovementId,
    pub user_id: AccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<AccountId>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub amount: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct StatementEntryResponse {
    #[serde(flatten)]
    pub movement: MovementResponse,
    pub direction: Direction,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: String,
    pub statement: Vec<StatementEntryResponse>,
}

/// Render a money value with exactly two fractional digits.
pub fn money(value: Decimal) -> String {
    let mut v = value;
    v.rescale(Amount::SCALE);
    v.to_string()
}

impl From<&Movement> for MovementResponse {
    fn from(m: &Movement) -> Self {
        MovementResponse {
            id: m.movement_id(),
            user_id: m.owner_account_id(),
            sender_id: m.counterparty_account_id(),
            kind: m.kind().as_str(),
            amount: m.amount().to_string(),
            description: m.description().to_string(),
            created_at: m.created_at(),
            updated_at: m.updated_at(),
        }
    }
}

impl From<&StatementEntry> for StatementEntryResponse {
    fn from(e: &StatementEntry) -> Self {
        StatementEntryResponse {
            movement: MovementResponse::from(&e.movement),
            direction: e.direction,
        }
    }
}

impl From<&Statement> for BalanceResponse {
    fn from(s: &Statement) -> Self {
        BalanceResponse {
            balance: money(s.balance),
            statement: s.entries.iter().map(StatementEntryResponse::from).collect(),
        }
    }
}
