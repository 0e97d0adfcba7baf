use std::io::{Read, Write};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{account::AccountId, ledger::Ledger, transaction::TransactionError};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OperationType {
    /// Opens a new account for a holder. The opening balance may be
    /// empty, in which case the account starts at zero. Account numbers
    /// are handed out in order, so the first `open` creates account 1.
    ///
    /// An open looks like
    ///
    /// |type     |account |target |amount |holder |
    /// |---------|--------|-------|-------|-------|
    /// |open     |        |       |100.0  |Alice  |
    Open,

    /// Credits the account with the given amount.
    ///
    /// A deposit looks like
    ///
    /// |type     |account |target |amount |holder |
    /// |---------|--------|-------|-------|-------|
    /// |deposit  |1       |       |50.0   |       |
    Deposit,

    /// Debits the account with the given amount. Rejected when the
    /// account balance is lower than the amount.
    ///
    /// A withdrawal looks like
    ///
    /// |type     |account |target |amount |holder |
    /// |---------|--------|-------|-------|-------|
    /// |withdraw |1       |       |10.0   |       |
    Withdraw,

    /// Moves funds from `account` to `target`. Both must exist and
    /// the source must hold at least the amount.
    ///
    /// A transfer looks like
    ///
    /// |type     |account |target |amount |holder |
    /// |---------|--------|-------|-------|-------|
    /// |transfer |1       |2      |40.0   |       |
    Transfer,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Operation {
    /// Type of operation. See `OperationType` for more information.
    #[serde(rename = "type")]
    pub op_type: OperationType,

    /// Number cells are kept as text so a bad value rejects only its own row.
    pub account: Option<String>,

    pub target: Option<String>,

    pub amount: Option<String>,

    pub holder: Option<String>,
}

impl Operation {
    fn parse_account(field: &Option<String>) -> Result<AccountId, TransactionError> {
        field
            .as_deref()
            .ok_or(TransactionError::Malformed)?
            .parse()
            .map_err(|_| TransactionError::Malformed)
    }

    fn get_account(&self) -> Result<AccountId, TransactionError> {
        Self::parse_account(&self.account)
    }

    fn get_target(&self) -> Result<AccountId, TransactionError> {
        Self::parse_account(&self.target)
    }

    fn get_amount(&self) -> Result<Decimal, TransactionError> {
        self.amount
            .as_deref()
            .ok_or(TransactionError::Malformed)?
            .parse()
            .map_err(|_| TransactionError::Malformed)
    }

    /// Applies the operation to the ledger.
    pub fn apply_to(&self, ledger: &mut Ledger) -> Result<(), TransactionError> {
        match self.op_type {
            OperationType::Open => {
                let holder = self
                    .holder
                    .as_deref()
                    .filter(|h| !h.is_empty())
                    .ok_or(TransactionError::Malformed)?;

                let opening = match self.amount {
                    Some(_) => self.get_amount()?,
                    None => Decimal::ZERO,
                };

                ledger.create_account(holder, opening)?;
            }
            OperationType::Deposit => {
                let amount = self.get_amount()?;
                ledger.deposit(self.get_account()?, amount)?;
            }
            OperationType::Withdraw => {
                let amount = self.get_amount()?;
                ledger.withdraw(self.get_account()?, amount)?;
            }
            OperationType::Transfer => {
                let amount = self.get_amount()?;
                let target = self.get_target()?;
                ledger.transfer(self.get_account()?, target, amount)?;
            }
        }

        Ok(())
    }
}

/// One output row per account.
#[derive(Debug, Serialize, PartialEq)]
pub struct AccountSummary {
    pub account: String,
    pub holder: String,
    pub balance: Decimal,
    pub entries: usize,
}

/// Applies every operation in `input` to `ledger`. Rejected operations
/// are logged and skipped. Returns how many operations were applied.
pub fn replay<R: Read>(input: R, ledger: &mut Ledger) -> Result<usize, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut applied = 0;
    for (row, operation) in rdr.deserialize::<Operation>().enumerate() {
        let operation = operation?;

        match operation.apply_to(ledger) {
            Ok(()) => applied += 1,
            Err(err) => warn!(row = row + 1, op = ?operation.op_type, %err, "operation skipped"),
        }
    }

    info!(applied, accounts = ledger.account_count(), "replay finished");
    Ok(applied)
}

pub fn write_accounts<W: Write>(ledger: &Ledger, output: W) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(output);

    for account in ledger.accounts() {
        wtr.serialize(AccountSummary {
            account: account.id().to_string(),
            holder: account.holder().to_string(),
            balance: account.balance(),
            entries: account.history().len(),
        })?;
    }

    wtr.flush()?;
    Ok(())
}
