use std::fmt;

use chrono::{DateTime, Local};
use rust_decimal::Decimal;

use crate::{
    account::BankAccount,
    transaction::{TransactionKind, TransactionRecord},
};

const RECEIPT_WIDTH: usize = 50;
const HISTORY_WIDTH: usize = 70;

/// Summary of an operation that has already been committed.
///
/// Building a receipt reads nothing from the ledger, callers pass in the
/// post-operation balance of the source account.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    timestamp: DateTime<Local>,
    kind: TransactionKind,
    amount: Decimal,
    from: String,
    to: Option<String>,
    new_balance: Decimal,
}

impl Receipt {
    pub fn new(
        kind: TransactionKind,
        amount: Decimal,
        from: &str,
        to: Option<&str>,
        new_balance: Decimal,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            kind,
            amount,
            from: from.to_owned(),
            to: to.map(ToOwned::to_owned),
            new_balance,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> Option<&str> {
        self.to.as_deref()
    }

    pub fn new_balance(&self) -> Decimal {
        self.new_balance
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RECEIPT_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "{:^width$}", "TRANSACTION RECEIPT", width = RECEIPT_WIDTH)?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "Date/Time:    {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f, "Type:         {}", self.kind)?;
        writeln!(f, "Amount:       ${:.2}", self.amount)?;
        writeln!(f, "From Account: {}", self.from)?;
        if let Some(to) = &self.to {
            writeln!(f, "To Account:   {to}")?;
        }
        writeln!(f, "New Balance:  ${:.2}", self.new_balance)?;
        write!(f, "{rule}")
    }
}

/// Most-recent-first listing of an account's log, capped to the last
/// `limit` entries.
pub struct TransactionHistory {
    account_number: String,
    records: Vec<TransactionRecord>,
    total: usize,
}

impl TransactionHistory {
    pub fn new(account: &dyn BankAccount, limit: usize) -> Self {
        Self {
            account_number: account.number().to_owned(),
            records: account.recent_transactions(Some(limit)),
            total: account.transaction_count(),
        }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }
}

impl fmt::Display for TransactionHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return write!(f, "No transactions found for account {}.", self.account_number);
        }
        let rule = "=".repeat(HISTORY_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "  TRANSACTION HISTORY - Account: {}", self.account_number)?;
        writeln!(f, "{rule}")?;
        for record in &self.records {
            writeln!(f, "{record}")?;
        }
        write!(f, "{rule}")
    }
}
