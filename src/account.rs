use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::transaction::{EntryKind, HistoryEntry, TransactionError};

/// Account number. Rendered as eight zero-padded digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(pub u64);

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TransactionError::AccountNotFound);
        }

        s.parse::<u64>()
            .map(AccountId)
            .map_err(|_| TransactionError::AccountNotFound)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    holder: String,
    balance: Decimal,
    history: Vec<HistoryEntry>,
}

impl Account {
    /// Opens an account and records the opening balance as its first entry.
    pub fn open(
        id: AccountId,
        holder: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<Self, TransactionError> {
        if initial_balance < Decimal::ZERO {
            return Err(TransactionError::InvalidAmount);
        }

        let mut account = Account {
            id,
            holder: holder.into(),
            balance: initial_balance,
            history: Vec::new(),
        };
        account.record(HistoryEntry::new(EntryKind::Opened, initial_balance));

        info!(account = %account.id, balance = %account.balance, "account opened");
        Ok(account)
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Entries in the order they were recorded.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    fn check_amount(amount: Decimal) -> Result<(), TransactionError> {
        if amount <= Decimal::ZERO {
            return Err(TransactionError::InvalidAmount);
        }

        Ok(())
    }

    fn check_funds(&self, amount: Decimal) -> Result<(), TransactionError> {
        if amount > self.balance {
            return Err(TransactionError::InsufficientFunds);
        }

        Ok(())
    }

    fn credited(&self, amount: Decimal) -> Result<Decimal, TransactionError> {
        self.balance
            .checked_add(amount)
            .ok_or(TransactionError::Overflow)
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<(), TransactionError> {
        let balance = match Self::check_amount(amount).and_then(|_| self.credited(amount)) {
            Ok(balance) => balance,
            Err(err) => {
                debug!(account = %self.id, %amount, %err, "deposit rejected");
                return Err(err);
            }
        };

        self.balance = balance;
        self.record(HistoryEntry::new(EntryKind::Deposit, amount));

        info!(account = %self.id, %amount, balance = %self.balance, "deposit applied");
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), TransactionError> {
        if let Err(err) = Self::check_amount(amount).and_then(|_| self.check_funds(amount)) {
            debug!(account = %self.id, %amount, %err, "withdrawal rejected");
            return Err(err);
        }

        self.balance -= amount;
        self.record(HistoryEntry::new(EntryKind::Withdrawal, amount));

        info!(account = %self.id, %amount, balance = %self.balance, "withdrawal applied");
        Ok(())
    }

    /// Moves funds to `target`.
    ///
    /// Every check runs before either account is touched, so a rejected
    /// transfer leaves both sides as they were. A successful transfer
    /// leaves two entries on this account, a `Withdrawal` followed by a
    /// `Transfer` naming the receiving holder, and one `Deposit` on the target.
    pub fn transfer(
        &mut self,
        target: Option<&mut Account>,
        amount: Decimal,
    ) -> Result<(), TransactionError> {
        let target = match target {
            Some(target) => target,
            None => {
                debug!(account = %self.id, %amount, "transfer rejected: no target");
                return Err(TransactionError::InvalidTarget);
            }
        };

        if let Err(err) = Self::check_amount(amount)
            .and_then(|_| self.check_funds(amount))
            .and_then(|_| target.credited(amount).map(|_| ()))
        {
            debug!(account = %self.id, target = %target.id, %amount, %err, "transfer rejected");
            return Err(err);
        }

        self.withdraw(amount)?;
        target.deposit(amount)?;
        self.record(HistoryEntry::new(EntryKind::Transfer, amount).with_note(target.holder.clone()));

        info!(account = %self.id, target = %target.id, %amount, "transfer applied");
        Ok(())
    }
}
