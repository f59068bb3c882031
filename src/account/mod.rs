use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    receipt::Receipt,
    transaction::{TransactionKind, TransactionRecord},
};

pub mod current;
pub mod savings;

pub use current::CurrentAccount;
pub use savings::SavingsAccount;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Invalid {what}: {amount}")]
    InvalidAmount { what: &'static str, amount: Decimal },
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Transfer target account is invalid")]
    InvalidTarget,
    #[error("Interest rate cannot be negative, got {0}")]
    InvalidRate(Decimal),
    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

/// Number of accounts constructed so far.
///
/// Cloning yields another handle to the same count, so a registry can hand it
/// to every constructor it calls and still read the total without holding an
/// account.
#[derive(Debug, Clone, Default)]
pub struct AccountCounter(Arc<AtomicU64>);

impl AccountCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Read-only snapshot of an account identity and balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDetails {
    pub account_number: String,
    pub holder_name: String,
    pub balance: Decimal,
}

impl fmt::Display for AccountDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account: {} | Holder: {} | Balance: ${:.2}",
            self.account_number, self.holder_name, self.balance
        )
    }
}

/// State shared by every account variant: identity, balance and log.
///
/// The balance is private and only changes inside [`AccountCore::apply`],
/// which appends the record that describes the change.
#[derive(Debug)]
pub struct AccountCore {
    number: String,
    holder: String,
    balance: Decimal,
    log: Vec<TransactionRecord>,
}

impl AccountCore {
    fn open(
        counter: &AccountCounter,
        number: String,
        holder: String,
        initial_balance: Decimal,
    ) -> Result<Self, AccountError> {
        if initial_balance < Decimal::ZERO {
            return Err(AccountError::InvalidAmount {
                what: "initial balance",
                amount: initial_balance,
            });
        }
        let mut core = Self {
            number,
            holder,
            balance: Decimal::ZERO,
            log: Vec::new(),
        };
        core.apply(TransactionRecord::new(
            TransactionKind::Opened,
            initial_balance,
            "account opened with initial balance",
        ))?;
        counter.increment();
        info!(
            account = %core.number,
            holder = %core.holder,
            balance = %core.balance,
            "account opened"
        );
        Ok(core)
    }

    /// Commits `record`, or leaves the core untouched when the new balance
    /// does not fit in a [`Decimal`].
    fn apply(&mut self, record: TransactionRecord) -> Result<(), AccountError> {
        self.balance = self
            .balance
            .checked_add(record.signed_amount())
            .ok_or(AccountError::Overflow("balance"))?;
        self.log.push(record);
        Ok(())
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }
}

fn ensure_positive(what: &'static str, amount: Decimal) -> Result<(), AccountError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(AccountError::InvalidAmount { what, amount })
    }
}

fn deposit_description(amount: Decimal, note: &str) -> String {
    if note.is_empty() {
        format!("Deposited {amount}")
    } else {
        format!("Deposited {amount} with reference note: {note}")
    }
}

// Callers have already checked that `amount` is positive.
fn credit<A>(
    account: &mut A,
    kind: TransactionKind,
    amount: Decimal,
    description: String,
) -> Result<(), AccountError>
where
    A: BankAccount + ?Sized,
{
    let core = account.core_mut();
    if let Err(err) = core.apply(TransactionRecord::new(kind, amount, description)) {
        warn!(account = %core.number, %kind, %amount, "credit rejected: {err}");
        return Err(err);
    }
    info!(account = %core.number, %kind, %amount, balance = %core.balance, "credited");
    Ok(())
}

// The one place where every variant takes money out. Only the
// available balance differs between variants.
fn debit<A>(
    account: &mut A,
    kind: TransactionKind,
    amount: Decimal,
    description: String,
) -> Result<(), AccountError>
where
    A: BankAccount + ?Sized,
{
    if let Err(err) = ensure_positive("withdrawal amount", amount) {
        warn!(account = %account.number(), %amount, %kind, "debit rejected");
        return Err(err);
    }
    let available = account.available_balance();
    if amount > available {
        warn!(account = %account.number(), %amount, %available, "insufficient funds");
        return Err(AccountError::InsufficientFunds {
            requested: amount,
            available,
        });
    }
    let core = account.core_mut();
    core.apply(TransactionRecord::new(kind, amount, description))?;
    info!(account = %core.number, %kind, %amount, balance = %core.balance, "debited");
    Ok(())
}

/// Balance operations every account variant supports.
///
/// Implementors supply access to their [`AccountCore`] plus the two policy
/// hooks (available balance and interest); the operations themselves are
/// shared.
pub trait BankAccount {
    fn core(&self) -> &AccountCore;

    fn core_mut(&mut self) -> &mut AccountCore;

    /// Maximum amount a withdrawal may draw.
    fn available_balance(&self) -> Decimal;

    /// Interest the account would earn on its current balance. Never mutates.
    fn calculate_interest(&self) -> Result<Decimal, AccountError>;

    /// Variant specific line shown next to the account details.
    fn additional_info(&self) -> String;

    fn number(&self) -> &str {
        self.core().number()
    }

    fn holder(&self) -> &str {
        self.core().holder()
    }

    fn balance(&self) -> Decimal {
        self.core().balance()
    }

    fn deposit(&mut self, amount: Decimal, note: &str) -> Result<(), AccountError> {
        if let Err(err) = ensure_positive("deposit amount", amount) {
            warn!(account = %self.number(), %amount, "deposit rejected");
            return Err(err);
        }
        credit(
            self,
            TransactionKind::Deposit,
            amount,
            deposit_description(amount, note),
        )
    }

    fn withdraw(&mut self, amount: Decimal) -> Result<(), AccountError> {
        debit(self, TransactionKind::Withdraw, amount, "withdrawal".to_string())
    }

    fn account_details(&self) -> AccountDetails {
        AccountDetails {
            account_number: self.number().to_owned(),
            holder_name: self.holder().to_owned(),
            balance: self.balance(),
        }
    }

    /// Copy of the full log, oldest first.
    fn transaction_log(&self) -> Vec<TransactionRecord> {
        self.core().log.clone()
    }

    fn transaction_count(&self) -> usize {
        self.core().log.len()
    }

    /// Copy of the last `limit` records, most recent first.
    fn recent_transactions(&self, limit: Option<usize>) -> Vec<TransactionRecord> {
        let log = &self.core().log;
        log.iter()
            .rev()
            .take(limit.unwrap_or(log.len()))
            .cloned()
            .collect()
    }

    /// Balance recomputed from the log alone. Always equal to [`Self::balance`].
    fn replayed_balance(&self) -> Decimal {
        self.core()
            .log
            .iter()
            .map(TransactionRecord::signed_amount)
            .sum()
    }
}

/// Moving money between two accounts.
pub trait Transfer: BankAccount {
    /// Debits `amount` from `self` and credits it to `target`.
    ///
    /// Every check, including whether the target balance can take the
    /// amount, runs before the debit. A returned error therefore always means
    /// nothing changed on either side.
    fn transfer(
        &mut self,
        amount: Decimal,
        target: Option<&mut dyn BankAccount>,
    ) -> Result<Receipt, AccountError> {
        let Some(target) = target else {
            warn!(account = %self.number(), %amount, "transfer without target");
            return Err(AccountError::InvalidTarget);
        };
        if let Err(err) = ensure_positive("transfer amount", amount) {
            warn!(account = %self.number(), %amount, "transfer rejected");
            return Err(err);
        }
        // the credit below must not fail once the source has been debited
        if target.balance().checked_add(amount).is_none() {
            warn!(account = %target.number(), %amount, "transfer would overflow target");
            return Err(AccountError::Overflow("balance"));
        }

        debit(
            self,
            TransactionKind::Transfer,
            amount,
            format!("Transfer to {}", target.number()),
        )?;
        let note = format!("Transfer from {}", self.number());
        credit(
            &mut *target,
            TransactionKind::Deposit,
            amount,
            deposit_description(amount, &note),
        )?;

        debug!(from = %self.number(), to = %target.number(), %amount, "transfer committed");
        Ok(Receipt::new(
            TransactionKind::Transfer,
            amount,
            self.number(),
            Some(target.number()),
            self.balance(),
        ))
    }
}

#[derive(Debug)]
pub enum Account {
    Savings(SavingsAccount),
    Current(CurrentAccount),
}

impl Account {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Account::Savings(_) => "savings",
            Account::Current(_) => "current",
        }
    }

    pub fn as_savings_mut(&mut self) -> Option<&mut SavingsAccount> {
        match self {
            Account::Savings(acc) => Some(acc),
            Account::Current(_) => None,
        }
    }
}

impl From<SavingsAccount> for Account {
    fn from(acc: SavingsAccount) -> Self {
        Account::Savings(acc)
    }
}

impl From<CurrentAccount> for Account {
    fn from(acc: CurrentAccount) -> Self {
        Account::Current(acc)
    }
}

impl BankAccount for Account {
    fn core(&self) -> &AccountCore {
        match self {
            Account::Savings(acc) => acc.core(),
            Account::Current(acc) => acc.core(),
        }
    }

    fn core_mut(&mut self) -> &mut AccountCore {
        match self {
            Account::Savings(acc) => acc.core_mut(),
            Account::Current(acc) => acc.core_mut(),
        }
    }

    fn available_balance(&self) -> Decimal {
        match self {
            Account::Savings(acc) => acc.available_balance(),
            Account::Current(acc) => acc.available_balance(),
        }
    }

    fn calculate_interest(&self) -> Result<Decimal, AccountError> {
        match self {
            Account::Savings(acc) => acc.calculate_interest(),
            Account::Current(acc) => acc.calculate_interest(),
        }
    }

    fn additional_info(&self) -> String {
        match self {
            Account::Savings(acc) => acc.additional_info(),
            Account::Current(acc) => acc.additional_info(),
        }
    }
}

impl Transfer for Account {}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn savings(counter: &AccountCounter, number: &str, balance: i64) -> SavingsAccount {
        SavingsAccount::new(counter, number, "Alice", dec(balance), dec(5)).unwrap()
    }

    fn current(
        counter: &AccountCounter,
        number: &str,
        balance: i64,
        overdraft: i64,
    ) -> CurrentAccount {
        CurrentAccount::new(counter, number, "Bob", dec(balance), dec(overdraft)).unwrap()
    }

    #[test]
    fn opening_logs_one_record() {
        let counter = AccountCounter::new();
        let acc = savings(&counter, "S-1", 100);
        let log = acc.transaction_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind(), TransactionKind::Opened);
        assert_eq!(log[0].amount(), dec(100));
        assert_eq!(acc.balance(), dec(100));
    }

    #[test]
    fn negative_initial_balance_is_rejected() {
        let counter = AccountCounter::new();
        let err = CurrentAccount::new(&counter, "C-1", "Bob", dec(-1), dec(0)).unwrap_err();
        assert!(matches!(
            err,
            AccountError::InvalidAmount {
                what: "initial balance",
                ..
            }
        ));
        assert_eq!(counter.total(), 0);
    }

    #[test]
    fn non_positive_deposit_changes_nothing() {
        let counter = AccountCounter::new();
        let mut accounts: Vec<Account> = vec![
            savings(&counter, "S-1", 100).into(),
            current(&counter, "C-1", 100, 50).into(),
        ];
        for acc in accounts.iter_mut() {
            for amount in [dec(0), dec(-10)] {
                let err = acc.deposit(amount, "nope").unwrap_err();
                assert!(matches!(err, AccountError::InvalidAmount { .. }));
            }
            assert_eq!(acc.balance(), dec(100));
            assert_eq!(acc.transaction_log().len(), 1);
        }
    }

    #[test]
    fn deposit_appends_note() {
        let counter = AccountCounter::new();
        let mut acc = savings(&counter, "S-1", 0);
        acc.deposit(dec(40), "salary").unwrap();
        acc.deposit(dec(2), "").unwrap();
        let log = acc.transaction_log();
        assert_eq!(log.len(), 3);
        assert_eq!(log[1].kind(), TransactionKind::Deposit);
        assert_eq!(log[1].description(), "Deposited 40 with reference note: salary");
        assert_eq!(log[2].description(), "Deposited 2");
        assert_eq!(acc.balance(), dec(42));
    }

    #[test]
    fn withdraw_respects_available_balance() {
        let counter = AccountCounter::new();
        let mut saving = savings(&counter, "S-1", 100);
        let err = saving.withdraw(dec(101)).unwrap_err();
        assert_eq!(
            err,
            AccountError::InsufficientFunds {
                requested: dec(101),
                available: dec(100)
            }
        );
        assert_eq!(saving.balance(), dec(100));
        assert_eq!(saving.transaction_log().len(), 1);

        let mut curr = current(&counter, "C-1", 100, 50);
        curr.withdraw(dec(101)).unwrap();
        assert_eq!(curr.balance(), dec(-1));
        assert_eq!(curr.available_balance(), dec(49));
        let log = curr.transaction_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].kind(), TransactionKind::Withdraw);

        let err = curr.withdraw(dec(50)).unwrap_err();
        assert!(matches!(err, AccountError::InsufficientFunds { .. }));
        assert_eq!(curr.balance(), dec(-1));
    }

    #[test]
    fn withdraw_rejects_non_positive_amount() {
        let counter = AccountCounter::new();
        let mut acc = current(&counter, "C-1", 100, 50);
        let err = acc.withdraw(dec(0)).unwrap_err();
        assert!(matches!(err, AccountError::InvalidAmount { .. }));
        assert_eq!(acc.transaction_log().len(), 1);
    }

    #[test]
    fn transfer_moves_funds_and_logs_both_sides() {
        let counter = AccountCounter::new();
        let mut from = savings(&counter, "A", 500);
        let mut to = current(&counter, "B", 0, 0);

        let receipt = from.transfer(dec(200), Some(&mut to)).unwrap();

        assert_eq!(from.balance(), dec(300));
        assert_eq!(to.balance(), dec(200));
        assert_eq!(from.transaction_log().len(), 2);
        assert_eq!(to.transaction_log().len(), 2);
        let out = from.transaction_log().pop().unwrap();
        assert_eq!(out.kind(), TransactionKind::Transfer);
        assert_eq!(out.description(), "Transfer to B");
        let incoming = to.transaction_log().pop().unwrap();
        assert_eq!(incoming.kind(), TransactionKind::Deposit);
        assert!(incoming.description().contains("Transfer from A"));

        assert_eq!(receipt.from(), "A");
        assert_eq!(receipt.to(), Some("B"));
        assert_eq!(receipt.new_balance(), dec(300));
    }

    #[test]
    fn failed_transfer_changes_nothing() {
        let counter = AccountCounter::new();
        let mut from = savings(&counter, "A", 100);
        let mut to = savings(&counter, "B", 0);

        let err = from.transfer(dec(150), Some(&mut to)).unwrap_err();
        assert!(matches!(err, AccountError::InsufficientFunds { .. }));
        let err = from.transfer(dec(-5), Some(&mut to)).unwrap_err();
        assert!(matches!(err, AccountError::InvalidAmount { .. }));
        let err = from.transfer(dec(10), None).unwrap_err();
        assert_eq!(err, AccountError::InvalidTarget);

        assert_eq!(from.balance(), dec(100));
        assert_eq!(to.balance(), dec(0));
        assert_eq!(from.transaction_log().len(), 1);
        assert_eq!(to.transaction_log().len(), 1);
    }

    #[test]
    fn transfer_may_use_overdraft() {
        let counter = AccountCounter::new();
        let mut from = current(&counter, "C-1", 10, 100);
        let mut to = savings(&counter, "S-1", 0);
        from.transfer(dec(60), Some(&mut to)).unwrap();
        assert_eq!(from.balance(), dec(-50));
        assert_eq!(to.balance(), dec(60));
    }

    #[test]
    fn balance_matches_log_after_mixed_operations() {
        let counter = AccountCounter::new();
        let mut a: Account = savings(&counter, "A", 1000).into();
        let mut b: Account = current(&counter, "B", 50, 200).into();

        a.deposit(dec(25), "").unwrap();
        a.withdraw(dec(100)).unwrap();
        let _ = a.withdraw(dec(10_000));
        a.transfer(dec(300), Some(&mut b)).unwrap();
        b.withdraw(dec(500)).unwrap();
        let _ = b.transfer(dec(1), None);
        a.as_savings_mut().unwrap().apply_interest().unwrap();

        // 1000 + 25 - 100 - 300 = 625, plus 5% interest
        assert_eq!(a.balance(), Decimal::new(65625, 2));
        assert_eq!(b.balance(), dec(-150));
        for acc in [&a, &b] {
            assert_eq!(acc.replayed_balance(), acc.balance());
        }
    }

    #[test]
    fn deposit_overflow_is_rejected() {
        let counter = AccountCounter::new();
        let mut acc = SavingsAccount::new(&counter, "S-1", "Alice", Decimal::MAX, dec(0)).unwrap();

        let err = acc.deposit(dec(1), "").unwrap_err();
        assert_eq!(err, AccountError::Overflow("balance"));
        assert_eq!(acc.balance(), Decimal::MAX);
        assert_eq!(acc.transaction_log().len(), 1);
        assert_eq!(acc.replayed_balance(), acc.balance());
    }

    #[test]
    fn huge_overdraft_does_not_overflow_withdrawal() {
        let counter = AccountCounter::new();
        let mut acc =
            CurrentAccount::new(&counter, "C-1", "Bob", Decimal::MAX, Decimal::MAX).unwrap();
        assert_eq!(acc.available_balance(), Decimal::MAX);

        acc.withdraw(dec(1)).unwrap();
        assert_eq!(acc.balance(), Decimal::MAX - dec(1));
        assert_eq!(acc.transaction_log().len(), 2);
    }

    #[test]
    fn transfer_into_full_account_changes_nothing() {
        let counter = AccountCounter::new();
        let mut from = savings(&counter, "A", 100);
        let mut to = SavingsAccount::new(&counter, "B", "Bob", Decimal::MAX, dec(0)).unwrap();

        let err = from.transfer(dec(10), Some(&mut to)).unwrap_err();
        assert_eq!(err, AccountError::Overflow("balance"));
        assert_eq!(from.balance(), dec(100));
        assert_eq!(from.transaction_log().len(), 1);
        assert_eq!(to.balance(), Decimal::MAX);
        assert_eq!(to.transaction_log().len(), 1);
    }

    #[test]
    fn transaction_log_is_a_copy() {
        let counter = AccountCounter::new();
        let mut acc = savings(&counter, "S-1", 10);
        acc.deposit(dec(5), "").unwrap();

        let mut log = acc.transaction_log();
        log.clear();
        log.push(TransactionRecord::new(TransactionKind::Withdraw, dec(99), "forged"));

        let fresh = acc.transaction_log();
        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh[1].kind(), TransactionKind::Deposit);
        assert_eq!(acc.balance(), dec(15));
    }

    #[test]
    fn recent_transactions_are_most_recent_first() {
        let counter = AccountCounter::new();
        let mut acc = savings(&counter, "S-1", 0);
        for amount in 1..=4 {
            acc.deposit(dec(amount), "").unwrap();
        }
        let recent = acc.recent_transactions(Some(2));
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].amount(), dec(4));
        assert_eq!(recent[1].amount(), dec(3));
        assert_eq!(acc.recent_transactions(None).len(), 5);
        assert_eq!(acc.recent_transactions(Some(50)).len(), 5);
    }

    #[test]
    fn counter_is_shared_across_variants() {
        let counter = AccountCounter::new();
        let handle = counter.clone();
        let mut acc = savings(&counter, "S-1", 10);
        current(&counter, "C-1", 10, 0);
        assert_eq!(handle.total(), 2);

        let _ = acc.withdraw(dec(100));
        let _ = acc.deposit(dec(0), "");
        let _ = SavingsAccount::new(&counter, "S-2", "Eve", dec(1), dec(-1));
        assert_eq!(handle.total(), 2);
    }

    #[test]
    fn details_snapshot() {
        let counter = AccountCounter::new();
        let acc = savings(&counter, "S-1", 10);
        let details = acc.account_details();
        assert_eq!(
            details,
            AccountDetails {
                account_number: "S-1".to_string(),
                holder_name: "Alice".to_string(),
                balance: dec(10),
            }
        );
        assert_eq!(
            details.to_string(),
            "Account: S-1 | Holder: Alice | Balance: $10.00"
        );
    }
}
