use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::{Account, AccountError},
    receipt::Receipt,
};

pub mod in_memory_registry;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Account `{0}` not found")]
    NotFound(String),
    #[error("Account `{0}` already exists")]
    DuplicateAccount(String),
    #[error("Interest is applicable only for savings accounts, `{0}` is not one")]
    NotSavings(String),
    #[error(transparent)]
    AccountErr(#[from] AccountError),
}

pub trait AccountRegistry {
    /// Stores `account` under its own account number.
    ///
    /// Accounts are counted when they are constructed, not when they are
    /// inserted. Build them with the registry's own counter (see
    /// [`in_memory_registry::InMemoryAccountRegistry::counter`]) or they do not
    /// show up in [`Self::total_accounts_created`].
    fn insert(&mut self, account: Account) -> Result<(), RegistryError>;

    fn lookup(&self, number: &str) -> Result<&Account, RegistryError>;

    fn lookup_mut(&mut self, number: &str) -> Result<&mut Account, RegistryError>;

    /// Moves `amount` from account `from` to account `to`.
    ///
    /// A missing or identical target is reported as
    /// [`AccountError::InvalidTarget`], a missing source as
    /// [`RegistryError::NotFound`].
    fn transfer(&mut self, from: &str, to: &str, amount: Decimal) -> Result<Receipt, RegistryError>;

    fn total_accounts_created(&self) -> u64;
}
