use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use ledgerly_core::{AccountId, DomainError, MovementId};

use crate::{Amount, Description};

/// Movement category. Wire names follow the persisted `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "deposit")]
    Deposit,
    #[serde(rename = "withdraw")]
    Withdrawal,
    #[serde(rename = "transfer")]
    Transfer,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Deposit => "deposit",
            MovementKind::Withdrawal => "withdraw",
            MovementKind::Transfer => "transfer",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(MovementKind::Deposit),
            "withdraw" | "withdrawal" => Ok(MovementKind::Withdrawal),
            "transfer" => Ok(MovementKind::Transfer),
            other => Err(DomainError::validation(format!("unknown movement kind: {other}"))),
        }
    }
}

/// Immutable ledger entry.
///
/// A transfer is stored once, filed under the receiving account, with the
/// paying account in `counterparty_account_id`. Fields are private so the
/// "counterparty iff transfer" rule can only be satisfied through the
/// constructors below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MovementParts", into = "MovementParts")]
pub struct Movement {
    id: MovementId,
    owner_account_id: AccountId,
    counterparty_account_id: Option<AccountId>,
    kind: MovementKind,
    amount: Amount,
    description: Description,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Raw field set of a [`Movement`], used by storage adapters to rehydrate rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementParts {
    pub id: MovementId,
    pub owner_account_id: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_account_id: Option<AccountId>,
    pub kind: MovementKind,
    pub amount: Amount,
    pub description: Description,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movement {
    pub fn deposit(
        owner: AccountId,
        amount: Amount,
        description: Description,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::single_leg(owner, MovementKind::Deposit, amount, description, created_at)
    }

    pub fn withdrawal(
        owner: AccountId,
        amount: Amount,
        description: Description,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::single_leg(owner, MovementKind::Withdrawal, amount, description, created_at)
    }

    /// Transfer record, filed under `receiver` and paid by `sender`.
    pub fn transfer(
        receiver: AccountId,
        sender: AccountId,
        amount: Amount,
        description: Description,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MovementId::new(),
            owner_account_id: receiver,
            counterparty_account_id: Some(sender),
            kind: MovementKind::Transfer,
            amount,
            description,
            created_at,
            updated_at: created_at,
        }
    }

    fn single_leg(
        owner: AccountId,
        kind: MovementKind,
        amount: Amount,
        description: Description,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MovementId::new(),
            owner_account_id: owner,
            counterparty_account_id: None,
            kind,
            amount,
            description,
            created_at,
            updated_at: created_at,
        }
    }

    /// Rebuild a movement from stored fields, re-checking the record invariants.
    pub fn restore(parts: MovementParts) -> Result<Self, DomainError> {
        match (parts.kind, parts.counterparty_account_id) {
            (MovementKind::Transfer, None) => {
                return Err(DomainError::invariant("transfer without counterparty"));
            }
            (MovementKind::Deposit | MovementKind::Withdrawal, Some(_)) => {
                return Err(DomainError::invariant(format!(
                    "{} must not carry a counterparty",
                    parts.kind
                )));
            }
            _ => {}
        }
        if parts.counterparty_account_id == Some(parts.owner_account_id) {
            return Err(DomainError::invariant("transfer to the paying account"));
        }

        Ok(Self {
            id: parts.id,
            owner_account_id: parts.owner_account_id,
            counterparty_account_id: parts.counterparty_account_id,
            kind: parts.kind,
            amount: parts.amount,
            description: parts.description,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        })
    }

    pub fn movement_id(&self) -> MovementId {
        self.id
    }

    pub fn owner_account_id(&self) -> AccountId {
        self.owner_account_id
    }

    pub fn counterparty_account_id(&self) -> Option<AccountId> {
        self.counterparty_account_id
    }

    pub fn kind(&self) -> MovementKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// True when `account` either owns this record or paid for it.
    pub fn involves(&self, account: AccountId) -> bool {
        self.owner_account_id == account || self.counterparty_account_id == Some(account)
    }
}

impl TryFrom<MovementParts> for Movement {
    type Error = DomainError;

    fn try_from(value: MovementParts) -> Result<Self, Self::Error> {
        Self::restore(value)
    }
}

impl From<Movement> for MovementParts {
    fn from(m: Movement) -> Self {
        MovementParts {
            id: m.id,
            owner_account_id: m.owner_account_id,
            counterparty_account_id: m.counterparty_account_id,
            kind: m.kind,
            amount: m.amount,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amount(v: rust_decimal::Decimal) -> Amount {
        Amount::new(v).unwrap()
    }

    fn text(s: &str) -> Description {
        Description::new(s).unwrap()
    }

    #[test]
    fn transfer_is_filed_under_receiver() {
        let sender = AccountId::new();
        let receiver = AccountId::new();
        let m = Movement::transfer(receiver, sender, amount(dec!(400)), text("Peça"), Utc::now());

        assert_eq!(m.owner_account_id(), receiver);
        assert_eq!(m.counterparty_account_id(), Some(sender));
        assert_eq!(m.kind(), MovementKind::Transfer);
        assert_eq!(m.created_at(), m.updated_at());
        assert!(m.involves(sender));
        assert!(m.involves(receiver));
    }

    #[test]
    fn single_leg_movements_have_no_counterparty() {
        let owner = AccountId::new();
        let d = Movement::deposit(owner, amount(dec!(510)), text("Venda"), Utc::now());
        let w = Movement::withdrawal(owner, amount(dec!(100)), text("Compra"), Utc::now());
        assert_eq!(d.counterparty_account_id(), None);
        assert_eq!(w.counterparty_account_id(), None);
        assert_eq!(w.kind(), MovementKind::Withdrawal);
    }

    #[test]
    fn restore_rejects_transfer_without_counterparty() {
        let m = Movement::deposit(AccountId::new(), amount(dec!(1)), text("x"), Utc::now());
        let mut parts = MovementParts::from(m);
        parts.kind = MovementKind::Transfer;
        assert!(Movement::restore(parts).is_err());
    }

    #[test]
    fn restore_rejects_deposit_with_counterparty() {
        let m = Movement::deposit(AccountId::new(), amount(dec!(1)), text("x"), Utc::now());
        let mut parts = MovementParts::from(m);
        parts.counterparty_account_id = Some(AccountId::new());
        assert!(Movement::restore(parts).is_err());
    }

    #[test]
    fn serde_roundtrip_preserves_fields() {
        let m = Movement::transfer(
            AccountId::new(),
            AccountId::new(),
            amount(dec!(12.5)),
            text("Ajuda financeira"),
            Utc::now(),
        );
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["kind"], "transfer");
        assert_eq!(json["amount"], "12.50");

        let back: Movement = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn kind_parses_both_withdrawal_spellings() {
        assert_eq!("withdraw".parse::<MovementKind>().unwrap(), MovementKind::Withdrawal);
        assert_eq!("withdrawal".parse::<MovementKind>().unwrap(), MovementKind::Withdrawal);
        assert!("refund".parse::<MovementKind>().is_err());
    }
}
