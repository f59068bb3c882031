use std::io::Write;

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::account::{Account, BankAccount};

/// One row of the closing account summary.
#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub account: String,
    pub holder: String,
    pub kind: &'static str,
    pub balance: Decimal,
    pub available: Decimal,
    /// Empty when the interest does not fit in a `Decimal`.
    pub interest: Option<Decimal>,
}

impl From<&Account> for AccountSummary {
    fn from(acc: &Account) -> Self {
        Self {
            account: acc.number().to_owned(),
            holder: acc.holder().to_owned(),
            kind: acc.kind_name(),
            balance: acc.balance(),
            available: acc.available_balance(),
            interest: acc.calculate_interest().ok(),
        }
    }
}

/// Writes `accounts` as CSV, header first.
pub fn print_accounts<W: Write>(
    output: &mut W,
    accounts: impl IntoIterator<Item = AccountSummary>,
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    accounts.into_iter().try_for_each(|summary| {
        writer
            .serialize(&summary)
            .with_context(|| format!("Failed to write summary of account {}", summary.account))
    })?;
    writer.flush().context("Failed to flush account summary")
}
