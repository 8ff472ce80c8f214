//! Request validation for ledger operations.
//!
//! Checks run in a fixed order (source id, destination id, distinctness,
//! amount) so that a request violating several rules at once always reports
//! the same error.

use rust_decimal::Decimal;
use tally_shared::AccountId;
use thiserror::Error;

/// Validation errors for ledger requests.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Account ids are externally assigned positive integers.
    #[error("account id must be positive, got {0}")]
    NonPositiveAccountId(i64),

    /// A transfer needs two distinct accounts.
    #[error("cannot transfer between an account and itself (id {0})")]
    SameAccount(i64),

    /// Transfer amounts must be strictly positive.
    #[error("transfer amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// The amount would push a balance past the representable decimal
    /// range. Detected while applying the delta, not up front, because it
    /// depends on the balance the amount meets.
    #[error("amount out of range: {0}")]
    AmountOutOfRange(Decimal),
}

/// Validates an account id.
///
/// # Errors
///
/// Returns `ValidationError::NonPositiveAccountId` for ids below 1.
pub fn validate_account_id(id: AccountId) -> Result<(), ValidationError> {
    if id.is_positive() {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAccountId(id.value()))
    }
}

/// Validates the arguments of a transfer.
///
/// # Errors
///
/// Returns the first violated rule: non-positive source id, non-positive
/// destination id, identical accounts, then non-positive amount.
pub fn validate_transfer(
    from: AccountId,
    to: AccountId,
    amount: Decimal,
) -> Result<(), ValidationError> {
    validate_account_id(from)?;
    validate_account_id(to)?;

    if from == to {
        return Err(ValidationError::SameAccount(from.value()));
    }

    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }

    Ok(())
}
