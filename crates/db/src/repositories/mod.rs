//! Repository abstractions for data access.
//!
//! The ledger repository is the only way the rest of the application
//! touches account balances; transaction and locking details stay here.

pub mod ledger;

pub use ledger::{BalanceSnapshot, LedgerError, LedgerRepository, TransferOutcome};
