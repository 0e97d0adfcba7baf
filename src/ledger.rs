use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::account::{Account, AccountId};
use crate::transaction::TransactionError;

/// Owns every account. Ids come from a counter that only moves forward,
/// so two accounts never share an id and iteration order is creation order.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: BTreeMap<AccountId, Account>,
    next_id: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    pub fn create_account(
        &mut self,
        holder: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<AccountId, TransactionError> {
        let id = AccountId(self.next_id + 1);
        let account = Account::open(id, holder, initial_balance)?;

        self.next_id = id.0;
        self.accounts.insert(id, account);

        Ok(id)
    }

    pub fn get(&self, id: AccountId) -> Result<&Account, TransactionError> {
        self.accounts
            .get(&id)
            .ok_or(TransactionError::AccountNotFound)
    }

    pub fn get_mut(&mut self, id: AccountId) -> Result<&mut Account, TransactionError> {
        self.accounts
            .get_mut(&id)
            .ok_or(TransactionError::AccountNotFound)
    }

    /// Resolves an account number as typed by a user.
    pub fn lookup(&self, number: &str) -> Result<&Account, TransactionError> {
        self.get(number.parse()?)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn deposit(&mut self, id: AccountId, amount: Decimal) -> Result<(), TransactionError> {
        self.get_mut(id)?.deposit(amount)
    }

    pub fn withdraw(&mut self, id: AccountId, amount: Decimal) -> Result<(), TransactionError> {
        self.get_mut(id)?.withdraw(amount)
    }

    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(), TransactionError> {
        if !self.accounts.contains_key(&to) {
            debug!(account = %from, target = %to, "transfer rejected: unknown target");
            return Err(TransactionError::AccountNotFound);
        }

        if from == to {
            debug!(account = %from, "transfer rejected: source and target are the same");
            return Err(TransactionError::InvalidTarget);
        }

        // Take the source out so both accounts can be borrowed mutably.
        let mut source = self
            .accounts
            .remove(&from)
            .ok_or(TransactionError::AccountNotFound)?;

        let result = source.transfer(self.accounts.get_mut(&to), amount);
        self.accounts.insert(from, source);

        result
    }
}
