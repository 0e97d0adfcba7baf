use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    str::FromStr,
};

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::Account,
    ledger::Ledger,
    replay,
    transaction::{format_amount, TransactionError},
};

#[derive(Parser, Debug)]
#[clap(name = "toy-bank", version, about = "In-memory bank ledger", long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set, e.g. `info` or `toy_bank=debug`.
    #[clap(long, default_value = "warn", value_parser)]
    pub log_level: String,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the text menu (default)
    Interactive,

    /// Apply a CSV script of operations and print the resulting accounts
    Replay {
        #[clap(value_parser)]
        file: PathBuf,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("no amount given")]
    Empty,

    #[error("`{0}` is not a number")]
    NotANumber(String),
}

/// Parses a user-typed amount. Sign and magnitude are left to the ledger.
pub fn parse_amount(input: &str) -> Result<Decimal, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    Decimal::from_str(input).map_err(|_| ParseAmountError::NotANumber(input.to_string()))
}

fn failure_message(err: TransactionError, action: &str) -> String {
    match err {
        TransactionError::InvalidAmount => format!("{} amount must be greater than zero.", action),
        TransactionError::InsufficientFunds => "Insufficient funds.".to_string(),
        TransactionError::InvalidTarget => "Target account is invalid.".to_string(),
        TransactionError::AccountNotFound => "Account not found.".to_string(),
        other => format!("{} failed: {}.", action, other),
    }
}

/// The interactive menu. Reads answers from `input` and writes prompts
/// and results to `output`, so it can run against stdin/stdout or
/// against in-memory buffers.
pub struct Session<'a, R, W> {
    ledger: &'a mut Ledger,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(ledger: &'a mut Ledger, input: R, output: W) -> Self {
        Session {
            ledger,
            input,
            output,
        }
    }

    /// Runs until the exit option is chosen or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;

            let choice = match self.read_line()? {
                Some(choice) => choice,
                None => break,
            };

            match choice.as_str() {
                "1" => self.create_account()?,
                "2" => self.deposit()?,
                "3" => self.withdraw()?,
                "4" => self.transfer()?,
                "5" => self.display_balance()?,
                "6" => self.display_history()?,
                "7" => self.list_accounts()?,
                "8" => break,
                _ => writeln!(self.output, "Invalid option. Please try again.")?,
            }
        }

        writeln!(
            self.output,
            "Goodbye. {} account(s) open.",
            self.ledger.account_count()
        )?;
        self.output.flush()
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Banking System ===")?;
        writeln!(self.output, "1. Create Account")?;
        writeln!(self.output, "2. Deposit")?;
        writeln!(self.output, "3. Withdraw")?;
        writeln!(self.output, "4. Transfer")?;
        writeln!(self.output, "5. Display Account Balance")?;
        writeln!(self.output, "6. View Transaction History")?;
        writeln!(self.output, "7. List Accounts")?;
        writeln!(self.output, "8. Exit")?;
        write!(self.output, "Select an option: ")?;
        self.output.flush()
    }

    /// `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        self.read_line()
    }

    fn prompt_amount(&mut self, text: &str) -> io::Result<Option<Decimal>> {
        let line = match self.prompt(text)? {
            Some(line) => line,
            None => return Ok(None),
        };

        match parse_amount(&line) {
            Ok(amount) => Ok(Some(amount)),
            Err(_) => {
                writeln!(self.output, "Invalid amount.")?;
                Ok(None)
            }
        }
    }

    /// Asks for an account number and resolves it.
    fn prompt_account(&mut self, text: &str) -> io::Result<Option<&Account>> {
        let number = match self.prompt(text)? {
            Some(number) => number,
            None => return Ok(None),
        };

        match self.ledger.lookup(&number) {
            Ok(account) => Ok(Some(account)),
            Err(_) => {
                writeln!(self.output, "Account not found.")?;
                Ok(None)
            }
        }
    }

    fn create_account(&mut self) -> io::Result<()> {
        let name = match self.prompt("Enter Account Holder Name: ")? {
            Some(name) => name,
            None => return Ok(()),
        };

        let initial_balance = match self.prompt("Enter Initial Balance: ")? {
            Some(line) => match parse_amount(&line) {
                Ok(amount) => amount,
                Err(_) => return writeln!(self.output, "Invalid balance amount."),
            },
            None => return Ok(()),
        };

        match self.ledger.create_account(name, initial_balance) {
            Ok(id) => writeln!(
                self.output,
                "Account created successfully. Account Number: {}",
                id
            ),
            Err(TransactionError::InvalidAmount) => {
                writeln!(self.output, "Initial balance cannot be negative.")
            }
            Err(err) => writeln!(self.output, "{}", failure_message(err, "Account creation")),
        }
    }

    fn deposit(&mut self) -> io::Result<()> {
        let id = match self.prompt_account("Enter Account Number: ")? {
            Some(account) => account.id(),
            None => return Ok(()),
        };

        let amount = match self.prompt_amount("Enter deposit amount: ")? {
            Some(amount) => amount,
            None => return Ok(()),
        };

        match self.ledger.deposit(id, amount) {
            Ok(()) => writeln!(
                self.output,
                "Deposited {} successfully.",
                format_amount(amount)
            ),
            Err(err) => writeln!(self.output, "{}", failure_message(err, "Deposit")),
        }
    }

    fn withdraw(&mut self) -> io::Result<()> {
        let id = match self.prompt_account("Enter Account Number: ")? {
            Some(account) => account.id(),
            None => return Ok(()),
        };

        let amount = match self.prompt_amount("Enter withdrawal amount: ")? {
            Some(amount) => amount,
            None => return Ok(()),
        };

        match self.ledger.withdraw(id, amount) {
            Ok(()) => writeln!(self.output, "Withdrew {} successfully.", format_amount(amount)),
            Err(err) => writeln!(self.output, "{}", failure_message(err, "Withdrawal")),
        }
    }

    fn transfer(&mut self) -> io::Result<()> {
        let from = match self.prompt_account("Enter your account number: ")? {
            Some(account) => account.id(),
            None => return Ok(()),
        };

        let (to, holder) = match self.prompt_account("Enter target account number: ")? {
            Some(account) => (account.id(), account.holder().to_string()),
            None => return Ok(()),
        };

        let amount = match self.prompt_amount("Enter transfer amount: ")? {
            Some(amount) => amount,
            None => return Ok(()),
        };

        match self.ledger.transfer(from, to, amount) {
            Ok(()) => writeln!(
                self.output,
                "Transferred {} to {} successfully.",
                format_amount(amount),
                holder
            ),
            Err(TransactionError::InsufficientFunds) => {
                writeln!(self.output, "Insufficient funds for transfer.")
            }
            Err(err) => writeln!(self.output, "{}", failure_message(err, "Transfer")),
        }
    }

    fn display_balance(&mut self) -> io::Result<()> {
        let line = match self.prompt_account("Enter Account Number: ")? {
            Some(account) => format!(
                "Account Holder: {}, Account Number: {}, Balance: {}",
                account.holder(),
                account.id(),
                format_amount(account.balance())
            ),
            None => return Ok(()),
        };

        writeln!(self.output, "{}", line)
    }

    fn display_history(&mut self) -> io::Result<()> {
        let lines = match self.prompt_account("Enter Account Number: ")? {
            Some(account) => std::iter::once(format!(
                "Transaction History for {} ({}):",
                account.holder(),
                account.id()
            ))
            .chain(account.history().iter().map(|entry| entry.to_string()))
            .collect::<Vec<_>>(),
            None => return Ok(()),
        };

        for line in lines {
            writeln!(self.output, "{}", line)?;
        }

        Ok(())
    }

    fn list_accounts(&mut self) -> io::Result<()> {
        replay::write_accounts(self.ledger, &mut self.output)
            .map_err(io::Error::from)
    }
}
