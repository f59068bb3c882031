use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::config::LedgerConfig;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Savings,
    Current,
    Deposit,
    Withdraw,
    Transfer,
    Interest,
    Rate,
    Details,
    History,
    Total,
}

/// One row of an operation batch. Which columns are needed depends on `op`.
///
/// Decimal columns are parsed from their text, so values wider than a `u64`
/// keep every digit.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    pub op: OperationKind,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub holder: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub rate: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub overdraft: Option<Decimal>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    OpenSavings {
        number: String,
        holder: String,
        initial_balance: Decimal,
        interest_rate: Decimal,
    },
    OpenCurrent {
        number: String,
        holder: String,
        initial_balance: Decimal,
        overdraft_limit: Decimal,
    },
    Deposit {
        number: String,
        amount: Decimal,
        note: String,
    },
    Withdraw {
        number: String,
        amount: Decimal,
    },
    Transfer {
        from: String,
        to: String,
        amount: Decimal,
    },
    ApplyInterest {
        number: String,
    },
    SetRate {
        number: String,
        rate: Decimal,
    },
    Details {
        number: String,
    },
    History {
        number: String,
        limit: usize,
    },
    TotalAccounts,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Account number is required for {kind:?}")]
    AccountRequired { kind: OperationKind },
    #[error("Amount is required for {kind:?}")]
    AmountRequired { kind: OperationKind },
    #[error("Target account is required for {kind:?}")]
    TargetRequired { kind: OperationKind },
    #[error("Holder name is required for {kind:?}")]
    HolderRequired { kind: OperationKind },
    #[error("Interest rate is required for {kind:?}")]
    RateRequired { kind: OperationKind },
}

impl LedgerCommand {
    /// Checks that `operation` carries the columns its kind needs.
    ///
    /// Amounts are not validated here, the accounts reject bad ones themselves.
    pub fn parse_command(
        operation: Operation,
        config: &LedgerConfig,
    ) -> Result<Self, CommandError> {
        let kind = operation.op;
        match kind {
            OperationKind::Savings => Ok(Self::OpenSavings {
                number: required(operation.account, CommandError::AccountRequired { kind })?,
                holder: required(operation.holder, CommandError::HolderRequired { kind })?,
                initial_balance: operation.amount.unwrap_or_default(),
                interest_rate: operation.rate.unwrap_or(config.default_interest_rate),
            }),
            OperationKind::Current => Ok(Self::OpenCurrent {
                number: required(operation.account, CommandError::AccountRequired { kind })?,
                holder: required(operation.holder, CommandError::HolderRequired { kind })?,
                initial_balance: operation.amount.unwrap_or_default(),
                overdraft_limit: operation
                    .overdraft
                    .unwrap_or(config.default_overdraft_limit),
            }),
            OperationKind::Deposit => Ok(Self::Deposit {
                number: required(operation.account, CommandError::AccountRequired { kind })?,
                amount: required(operation.amount, CommandError::AmountRequired { kind })?,
                note: operation.note.unwrap_or_default(),
            }),
            OperationKind::Withdraw => Ok(Self::Withdraw {
                number: required(operation.account, CommandError::AccountRequired { kind })?,
                amount: required(operation.amount, CommandError::AmountRequired { kind })?,
            }),
            OperationKind::Transfer => Ok(Self::Transfer {
                from: required(operation.account, CommandError::AccountRequired { kind })?,
                to: required(operation.target, CommandError::TargetRequired { kind })?,
                amount: required(operation.amount, CommandError::AmountRequired { kind })?,
            }),
            OperationKind::Interest => Ok(Self::ApplyInterest {
                number: required(operation.account, CommandError::AccountRequired { kind })?,
            }),
            OperationKind::Rate => Ok(Self::SetRate {
                number: required(operation.account, CommandError::AccountRequired { kind })?,
                rate: required(operation.rate, CommandError::RateRequired { kind })?,
            }),
            OperationKind::Details => Ok(Self::Details {
                number: required(operation.account, CommandError::AccountRequired { kind })?,
            }),
            OperationKind::History => Ok(Self::History {
                number: required(operation.account, CommandError::AccountRequired { kind })?,
                limit: config.history_limit,
            }),
            OperationKind::Total => Ok(Self::TotalAccounts),
        }
    }
}

fn required<T>(value: Option<T>, err: CommandError) -> Result<T, CommandError> {
    value.ok_or(err)
}
