use std::fmt;

use chrono::{DateTime, Local};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Opened,
    Deposit,
    Withdraw,
    Transfer,
    InterestApplied,
}

impl TransactionKind {
    /// Credits add to the balance, everything else (withdrawals and outgoing
    /// transfers) takes from it.
    pub fn is_credit(self) -> bool {
        match self {
            TransactionKind::Opened
            | TransactionKind::Deposit
            | TransactionKind::InterestApplied => true,
            TransactionKind::Withdraw | TransactionKind::Transfer => false,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionKind::Opened => "Account Created",
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdraw => "Withdraw",
            TransactionKind::Transfer => "Transfer",
            TransactionKind::InterestApplied => "Interest Applied",
        };
        f.write_str(name)
    }
}

/// Single entry of an account's transaction log.
///
/// Records are produced by the account itself while it commits a balance
/// change and are never modified afterwards, so only getters are exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    timestamp: DateTime<Local>,
    kind: TransactionKind,
    amount: Decimal,
    description: String,
}

impl TransactionRecord {
    pub(crate) fn new(
        kind: TransactionKind,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            kind,
            amount,
            description: description.into(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Amount with the sign it has on the balance.
    pub fn signed_amount(&self) -> Decimal {
        if self.kind.is_credit() {
            self.amount
        } else {
            -self.amount
        }
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | ${:.2} | {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.kind,
            self.amount,
            self.description
        )
    }
}
