use rust_decimal::Decimal;
use tracing::debug;

use crate::transaction::TransactionKind;

use super::{AccountCore, AccountCounter, AccountError, BankAccount, Transfer, credit};

/// Account that earns interest on its balance and has no overdraft.
#[derive(Debug)]
pub struct SavingsAccount {
    core: AccountCore,
    interest_rate: Decimal,
}

impl SavingsAccount {
    pub fn new(
        counter: &AccountCounter,
        number: impl Into<String>,
        holder: impl Into<String>,
        initial_balance: Decimal,
        interest_rate: Decimal,
    ) -> Result<Self, AccountError> {
        validate_rate(interest_rate)?;
        Ok(Self {
            core: AccountCore::open(counter, number.into(), holder.into(), initial_balance)?,
            interest_rate,
        })
    }

    /// Interest rate in percent.
    pub fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    pub fn set_interest_rate(&mut self, rate: Decimal) -> Result<(), AccountError> {
        validate_rate(rate)?;
        self.interest_rate = rate;
        Ok(())
    }

    /// Credits the interest earned on the current balance.
    ///
    /// Returns the credited amount, or `None` when there was nothing to credit.
    pub fn apply_interest(&mut self) -> Result<Option<Decimal>, AccountError> {
        let interest = self.calculate_interest()?;
        if interest <= Decimal::ZERO {
            debug!(account = %self.number(), %interest, "no interest to apply");
            return Ok(None);
        }
        let description = format!("Interest applied @ {}%", self.interest_rate);
        credit(self, TransactionKind::InterestApplied, interest, description)?;
        Ok(Some(interest))
    }
}

fn validate_rate(rate: Decimal) -> Result<(), AccountError> {
    if rate < Decimal::ZERO {
        Err(AccountError::InvalidRate(rate))
    } else {
        Ok(())
    }
}

impl BankAccount for SavingsAccount {
    fn core(&self) -> &AccountCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AccountCore {
        &mut self.core
    }

    fn available_balance(&self) -> Decimal {
        self.core.balance()
    }

    fn calculate_interest(&self) -> Result<Decimal, AccountError> {
        self.interest_rate
            .checked_div(Decimal::ONE_HUNDRED)
            .and_then(|rate| self.core.balance().checked_mul(rate))
            .ok_or(AccountError::Overflow("interest"))
    }

    fn additional_info(&self) -> String {
        match self.calculate_interest() {
            Ok(interest) => format!(
                "Interest Rate: {}% | Accrued Interest: ${:.2}",
                self.interest_rate, interest
            ),
            Err(err) => format!("Interest Rate: {}% | {err}", self.interest_rate),
        }
    }
}

impl Transfer for SavingsAccount {}
