/// Account variants and the balance operations they share.
/// Every balance change goes through the account core, which appends the
/// matching [`transaction::TransactionRecord`] in the same step.
pub mod account;

/// Transaction log entries.
pub mod transaction;

/// Human readable receipts and history listings for committed operations.
pub mod receipt;

/// Lookup of accounts by number and transfers between them. The trait is the
/// seam for other storage; [`registry::in_memory_registry`] keeps everything
/// in a `HashMap`.
pub mod registry;

/// Operation rows of a batch and their validation into ledger commands.
pub mod command;

pub mod config;

/// CSV batch runner behind the `bank-ledger` binary. Lives in the library so
/// the integration tests can drive it directly.
pub mod bin_utils;
