use std::collections::{HashMap, hash_map::Entry};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    account::{
        Account, AccountCounter, BankAccount, CurrentAccount, SavingsAccount, Transfer,
    },
    receipt::Receipt,
};

use super::{AccountRegistry, RegistryError};

#[derive(Debug, Default)]
pub struct InMemoryAccountRegistry {
    counter: AccountCounter,
    accounts: HashMap<String, Account>,
}

impl InMemoryAccountRegistry {
    /// Counter handed to every account this registry opens. Accounts built
    /// elsewhere with the same handle count towards the same total.
    pub fn counter(&self) -> &AccountCounter {
        &self.counter
    }

    pub fn open_savings(
        &mut self,
        number: &str,
        holder: &str,
        initial_balance: Decimal,
        interest_rate: Decimal,
    ) -> Result<&mut Account, RegistryError> {
        let Entry::Vacant(entry) = self.accounts.entry(number.to_owned()) else {
            return Err(RegistryError::DuplicateAccount(number.to_owned()));
        };
        let acc = SavingsAccount::new(
            &self.counter,
            number,
            holder,
            initial_balance,
            interest_rate,
        )?;
        Ok(entry.insert(acc.into()))
    }

    pub fn open_current(
        &mut self,
        number: &str,
        holder: &str,
        initial_balance: Decimal,
        overdraft_limit: Decimal,
    ) -> Result<&mut Account, RegistryError> {
        let Entry::Vacant(entry) = self.accounts.entry(number.to_owned()) else {
            return Err(RegistryError::DuplicateAccount(number.to_owned()));
        };
        let acc = CurrentAccount::new(
            &self.counter,
            number,
            holder,
            initial_balance,
            overdraft_limit,
        )?;
        Ok(entry.insert(acc.into()))
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountRegistry for InMemoryAccountRegistry {
    fn insert(&mut self, account: Account) -> Result<(), RegistryError> {
        match self.accounts.entry(account.number().to_owned()) {
            Entry::Occupied(entry) => Err(RegistryError::DuplicateAccount(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(account);
                Ok(())
            }
        }
    }

    fn lookup(&self, number: &str) -> Result<&Account, RegistryError> {
        self.accounts
            .get(number)
            .ok_or_else(|| RegistryError::NotFound(number.to_owned()))
    }

    fn lookup_mut(&mut self, number: &str) -> Result<&mut Account, RegistryError> {
        self.accounts
            .get_mut(number)
            .ok_or_else(|| RegistryError::NotFound(number.to_owned()))
    }

    fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<Receipt, RegistryError> {
        // take the source out so both sides can be borrowed mutably at once
        let Some(mut source) = self.accounts.remove(from) else {
            warn!(account = %from, "transfer source not found");
            return Err(RegistryError::NotFound(from.to_owned()));
        };
        let target = self
            .accounts
            .get_mut(to)
            .map(|acc| acc as &mut dyn BankAccount);
        let result = source.transfer(amount, target);
        self.accounts.insert(from.to_owned(), source);
        debug!(%from, %to, %amount, ok = result.is_ok(), "transfer processed");
        result.map_err(RegistryError::from)
    }

    fn total_accounts_created(&self) -> u64 {
        self.counter.total()
    }
}
