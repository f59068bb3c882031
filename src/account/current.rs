use rust_decimal::Decimal;

use super::{AccountCore, AccountCounter, AccountError, BankAccount, Transfer};

/// Account without interest that may go below zero down to its overdraft limit.
#[derive(Debug)]
pub struct CurrentAccount {
    core: AccountCore,
    overdraft_limit: Decimal,
}

impl CurrentAccount {
    pub fn new(
        counter: &AccountCounter,
        number: impl Into<String>,
        holder: impl Into<String>,
        initial_balance: Decimal,
        overdraft_limit: Decimal,
    ) -> Result<Self, AccountError> {
        if overdraft_limit < Decimal::ZERO {
            return Err(AccountError::InvalidAmount {
                what: "overdraft limit",
                amount: overdraft_limit,
            });
        }
        Ok(Self {
            core: AccountCore::open(counter, number.into(), holder.into(), initial_balance)?,
            overdraft_limit,
        })
    }

    pub fn overdraft_limit(&self) -> Decimal {
        self.overdraft_limit
    }
}

impl BankAccount for CurrentAccount {
    fn core(&self) -> &AccountCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AccountCore {
        &mut self.core
    }

    // Saturating is exact here: no representable withdrawal exceeds MAX.
    fn available_balance(&self) -> Decimal {
        self.core.balance().saturating_add(self.overdraft_limit)
    }

    fn calculate_interest(&self) -> Result<Decimal, AccountError> {
        Ok(Decimal::ZERO)
    }

    fn additional_info(&self) -> String {
        format!(
            "Overdraft Limit: ${:.2} | Available Balance: ${:.2}",
            self.overdraft_limit,
            self.available_balance()
        )
    }
}

impl Transfer for CurrentAccount {}
