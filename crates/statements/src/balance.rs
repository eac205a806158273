//! Balance aggregation over an account's movement records.
//!
//! A transfer row counts twice from two perspectives: as a credit for the
//! account that owns it and as a debit for the account named as its
//! counterparty. Both views are derived here and nowhere else.

use rust_decimal::Decimal;
use serde::Serialize;

use ledgerly_core::{AccountId, DomainError, DomainResult};

use crate::{Movement, MovementKind};

/// Direction of a movement relative to the account viewing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Credit,
    Debit,
}

/// One line of an account statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementEntry {
    pub movement: Movement,
    pub direction: Direction,
}

/// Derived balance plus the ordered history it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub account_id: AccountId,
    pub balance: Decimal,
    pub entries: Vec<StatementEntry>,
}

/// Signed contribution of `movement` to `account`'s balance.
///
/// Records that do not involve `account` contribute nothing, so a store
/// returning a superset of rows cannot skew the result.
fn contribution(account: AccountId, movement: &Movement) -> Decimal {
    let amount = movement.amount().value();
    if movement.owner_account_id() == account {
        match movement.kind() {
            MovementKind::Deposit | MovementKind::Transfer => amount,
            MovementKind::Withdrawal => -amount,
        }
    } else if movement.kind() == MovementKind::Transfer
        && movement.counterparty_account_id() == Some(account)
    {
        -amount
    } else {
        Decimal::ZERO
    }
}

/// Balance of `account` given the records it owns and the transfers it paid.
///
/// Fails instead of panicking when the stored amounts do not fit a `Decimal`.
pub fn fold_balance(account: AccountId, owned: &[Movement], paid: &[Movement]) -> DomainResult<Decimal> {
    let credits_and_withdrawals = owned
        .iter()
        .filter(|m| m.owner_account_id() == account)
        .map(|m| contribution(account, m));
    let sent = paid
        .iter()
        .filter(|m| m.owner_account_id() != account)
        .map(|m| contribution(account, m));

    checked_total(credits_and_withdrawals.chain(sent))
}

fn checked_total(contributions: impl IntoIterator<Item = Decimal>) -> DomainResult<Decimal> {
    contributions
        .into_iter()
        .try_fold(Decimal::ZERO, |total, c| total.checked_add(c))
        .ok_or_else(|| DomainError::invariant("balance overflowed the decimal range"))
}

impl Statement {
    /// Build the statement for `account` from its owned and paid records.
    ///
    /// Entries are ordered by `created_at`, ties broken by id.
    pub fn build(account: AccountId, owned: Vec<Movement>, paid: Vec<Movement>) -> DomainResult<Self> {
        let balance = fold_balance(account, &owned, &paid)?;

        let mut entries: Vec<StatementEntry> = owned
            .into_iter()
            .filter(|m| m.owner_account_id() == account)
            .map(|movement| {
                let direction = match movement.kind() {
                    MovementKind::Withdrawal => Direction::Debit,
                    MovementKind::Deposit | MovementKind::Transfer => Direction::Credit,
                };
                StatementEntry { movement, direction }
            })
            .collect();

        for movement in paid {
            if movement.owner_account_id() == account {
                continue;
            }
            entries.push(StatementEntry {
                movement,
                direction: Direction::Debit,
            });
        }

        entries.sort_by(|a, b| {
            a.movement
                .created_at()
                .cmp(&b.movement.created_at())
                .then_with(|| a.movement.movement_id().cmp(&b.movement.movement_id()))
        });

        Ok(Self {
            account_id: account,
            balance,
            entries,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
