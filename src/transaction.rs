use std::fmt::Display;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransactionError {
    /// A monetary amount is zero or negative.
    /// Opening balances may be zero but never negative.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// Transaction could not be processed due to the account having insufficient funds.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Crediting the amount would take the balance past `Decimal::MAX`.
    #[error("balance would exceed the largest representable amount")]
    Overflow,

    /// Transfer has no usable destination account.
    #[error("target account is invalid")]
    InvalidTarget,

    /// Referenced account number does not resolve to an account.
    #[error("account not found")]
    AccountNotFound,

    /// Record contains invalid data.
    #[error("malformed record")]
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryKind {
    /// The account was opened. The amount is the opening balance,
    /// which may be zero.
    Opened,

    /// Funds were credited to the account.
    Deposit,

    /// Funds were debited from the account. A transfer out also
    /// produces one of these, immediately before its `Transfer` entry.
    Withdrawal,

    /// Funds left the account for another holder.
    /// The note of the entry names the receiving holder.
    Transfer,
}

/// One completed mutation of an account. Entries are never
/// modified once appended to an account's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: EntryKind,
    pub amount: Decimal,
    pub note: Option<String>,
}

impl HistoryEntry {
    pub fn new(kind: EntryKind, amount: Decimal) -> Self {
        HistoryEntry {
            timestamp: Utc::now(),
            kind,
            amount,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn description(&self) -> String {
        let amount = format_amount(self.amount);
        match self.kind {
            EntryKind::Opened => format!("Account created with initial balance: {}", amount),
            EntryKind::Deposit => format!("Deposited: {}", amount),
            EntryKind::Withdrawal => format!("Withdrew: {}", amount),
            EntryKind::Transfer => match &self.note {
                Some(holder) => format!("Transferred: {} to {}", amount, holder),
                None => format!("Transferred: {}", amount),
            },
        }
    }
}

impl Display for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.description()
        )
    }
}

/// Two decimal places, no currency symbol.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
