//! Balance-ledger rules.
//!
//! This module implements the pure half of the ledger:
//! - Request validation (ids, transfer arguments)
//! - Balance arithmetic (delta application, overdraw detection)
//! - Display rounding and lock ordering

pub mod balance;
pub mod validation;

pub use balance::{BalanceError, apply_delta, lock_order, round_to_cents};
pub use validation::{ValidationError, validate_account_id, validate_transfer};
