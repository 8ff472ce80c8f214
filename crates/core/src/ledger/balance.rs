//! Balance arithmetic shared by every mutating operation.

use rust_decimal::{Decimal, RoundingStrategy};
use tally_shared::AccountId;
use thiserror::Error;

/// Decimal places carried by externally observed balances.
const DISPLAY_SCALE: u32 = 2;

/// Errors from applying a delta to a balance.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BalanceError {
    /// The debit would take the balance below zero.
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Balance at the time of the check.
        balance: Decimal,
        /// Absolute amount of the attempted debit.
        requested: Decimal,
    },

    /// The credit would push the balance past the representable decimal
    /// range.
    #[error("balance out of range: balance {balance}, delta {delta}")]
    OutOfRange {
        /// Balance at the time of the check.
        balance: Decimal,
        /// Delta that could not be applied.
        delta: Decimal,
    },
}

/// Applies a signed delta to a balance.
///
/// A positive delta credits, a negative delta debits, and zero is a
/// permitted no-op. The result is exact; rounding happens only when a
/// balance leaves the system.
///
/// # Errors
///
/// Returns `BalanceError::InsufficientFunds` when the result would be
/// negative and `BalanceError::OutOfRange` when the sum has no exact
/// decimal representation. The input balance is untouched either way.
pub fn apply_delta(balance: Decimal, delta: Decimal) -> Result<Decimal, BalanceError> {
    let next = balance
        .checked_add(delta)
        .ok_or(BalanceError::OutOfRange { balance, delta })?;
    if next < Decimal::ZERO {
        return Err(BalanceError::InsufficientFunds {
            balance,
            requested: delta.abs(),
        });
    }
    Ok(next)
}

/// Rounds a balance to two decimal places for external consumption.
///
/// Midpoints round away from zero, so 10.005 becomes 10.01.
#[must_use]
pub fn round_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Orders a pair of account ids for row locking.
///
/// Multi-row mutations lock rows in ascending id order; opposing transfers
/// between the same pair then queue on the first lock instead of
/// deadlocking on each other.
#[must_use]
pub fn lock_order(a: AccountId, b: AccountId) -> (AccountId, AccountId) {
    if a <= b { (a, b) } else { (b, a) }
}
