use ledgerly_core::AccountId;

/// Authenticated account for a request.
///
/// Inserted by the auth middleware; every statement route acts on behalf of
/// this account and nothing else.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AccountContext {
    account_id: AccountId,
}

impl AccountContext {
    pub fn new(account_id: AccountId) -> Self {
        Self { account_id }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }
}
