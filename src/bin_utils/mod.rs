//! Batch front end used by the `bank-ledger` binary and the integration tests.
//!
//! It plays the caller role: resolves account numbers through the registry,
//! runs ledger operations and renders their outcome. It holds no ledger
//! state of its own besides the registry it creates for a run.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::{
    account::BankAccount,
    command::{CommandError, LedgerCommand},
    config::LedgerConfig,
    receipt::{Receipt, TransactionHistory},
    registry::{AccountRegistry, RegistryError, in_memory_registry::InMemoryAccountRegistry},
    transaction::TransactionKind,
};
use csv_parser::CsvOperationParser;
use csv_printer::{AccountSummary, print_accounts};

pub mod csv_parser;
pub mod csv_printer;
pub mod logger;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("Malformed operation: {0}")]
    Malformed(#[from] csv::Error),
    #[error(transparent)]
    CommandErr(#[from] CommandError),
    #[error(transparent)]
    RegistryErr(#[from] RegistryError),
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub config: LedgerConfig,
    pub error_printer: Box<dyn FnMut(u64, OperationError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    /// Runs every operation of the batch, then prints a summary of all
    /// accounts sorted by account number.
    ///
    /// A malformed row or a failing operation is handed to `error_printer`
    /// and the batch goes on. Only output failures stop the run.
    pub fn run(mut self) -> Result<()> {
        let parser = CsvOperationParser::new(self.input);

        let mut registry = InMemoryAccountRegistry::default();

        for (line, row) in parser {
            let outcome = row
                .map_err(OperationError::from)
                .and_then(|operation| {
                    LedgerCommand::parse_command(operation, &self.config)
                        .map_err(OperationError::from)
                })
                .and_then(|cmd| execute(&mut registry, cmd).map_err(OperationError::from));
            match outcome {
                Ok(text) => writeln!(self.output, "{text}")
                    .context("Failed to write operation output")?,
                Err(err) => (self.error_printer)(line, err),
            }
        }

        let mut accounts: Vec<AccountSummary> =
            registry.accounts().map(AccountSummary::from).collect();
        accounts.sort_by(|a, b| a.account.cmp(&b.account));
        print_accounts(self.output, accounts)
    }
}

/// Runs one command against `registry` and renders what happened.
pub fn execute(
    registry: &mut InMemoryAccountRegistry,
    cmd: LedgerCommand,
) -> Result<String, RegistryError> {
    let text = match cmd {
        LedgerCommand::OpenSavings {
            number,
            holder,
            initial_balance,
            interest_rate,
        } => {
            registry.open_savings(&number, &holder, initial_balance, interest_rate)?;
            format!("Savings account {number} created for {holder}")
        }
        LedgerCommand::OpenCurrent {
            number,
            holder,
            initial_balance,
            overdraft_limit,
        } => {
            registry.open_current(&number, &holder, initial_balance, overdraft_limit)?;
            format!("Current account {number} created for {holder}")
        }
        LedgerCommand::Deposit {
            number,
            amount,
            note,
        } => {
            let acc = registry.lookup_mut(&number)?;
            acc.deposit(amount, &note)?;
            Receipt::new(TransactionKind::Deposit, amount, &number, None, acc.balance()).to_string()
        }
        LedgerCommand::Withdraw { number, amount } => {
            let acc = registry.lookup_mut(&number)?;
            acc.withdraw(amount)?;
            Receipt::new(TransactionKind::Withdraw, amount, &number, None, acc.balance())
                .to_string()
        }
        LedgerCommand::Transfer { from, to, amount } => {
            registry.transfer(&from, &to, amount)?.to_string()
        }
        LedgerCommand::ApplyInterest { number } => {
            let acc = registry.lookup_mut(&number)?;
            let Some(savings) = acc.as_savings_mut() else {
                return Err(RegistryError::NotSavings(number));
            };
            match savings.apply_interest()? {
                Some(interest) => Receipt::new(
                    TransactionKind::InterestApplied,
                    interest,
                    &number,
                    None,
                    savings.balance(),
                )
                .to_string(),
                None => format!("No interest to apply to {number}"),
            }
        }
        LedgerCommand::SetRate { number, rate } => {
            let acc = registry.lookup_mut(&number)?;
            let Some(savings) = acc.as_savings_mut() else {
                return Err(RegistryError::NotSavings(number));
            };
            savings.set_interest_rate(rate)?;
            format!("Interest rate of {number} set to {rate}%")
        }
        LedgerCommand::Details { number } => {
            let acc = registry.lookup(&number)?;
            format!("{}\n{}", acc.account_details(), acc.additional_info())
        }
        LedgerCommand::History { number, limit } => {
            let acc = registry.lookup(&number)?;
            TransactionHistory::new(acc, limit).to_string()
        }
        LedgerCommand::TotalAccounts => {
            format!("Total accounts created: {}", registry.total_accounts_created())
        }
    };
    Ok(text)
}
