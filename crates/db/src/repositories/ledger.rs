//! Ledger repository: balance reads and atomic balance mutations.
//!
//! Every mutation runs inside a database transaction with the touched rows
//! locked (`SELECT ... FOR UPDATE`), so concurrent operations on the same
//! account serialize instead of losing updates. Transfers lock both rows
//! in ascending id order, which keeps opposing transfers from deadlocking.
//! A transaction that is not committed rolls back when dropped, so an
//! abandoned or failed call never leaves a partial write behind.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QuerySelect, TransactionTrait,
};
use thiserror::Error;

use tally_core::ledger::{
    BalanceError, ValidationError, apply_delta, lock_order, round_to_cents, validate_account_id,
    validate_transfer,
};
use tally_shared::AccountId;

use crate::entities::accounts;

/// Errors returned by ledger operations.
///
/// The four variants are the complete vocabulary callers need to map
/// outcomes to responses; no string matching required.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The request failed validation before touching the store.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// No account row exists for the id.
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// The debit would take the balance below zero. Nothing was written.
    #[error(
        "insufficient funds on account {account_id}: balance {balance}, requested {requested}"
    )]
    InsufficientFunds {
        /// Account that lacks funds.
        account_id: AccountId,
        /// Balance observed under lock.
        balance: Decimal,
        /// Absolute amount that was requested.
        requested: Decimal,
    },

    /// The store failed (connection, lock timeout, aborted transaction).
    /// Safe to retry; the transaction rolled back.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Balance of one account as observed by a completed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSnapshot {
    /// Account the balance belongs to.
    pub account_id: AccountId,
    /// Balance rounded to two decimal places.
    pub balance: Decimal,
}

/// Both balances after a completed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Debited account.
    pub from: BalanceSnapshot,
    /// Credited account.
    pub to: BalanceSnapshot,
}

/// Repository for account balance operations.
///
/// Holds a pooled connection handle and no other state; every operation is
/// self-contained.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the current balance of an account.
    ///
    /// Read-only; takes no locks. Two reads with no mutation in between
    /// return the same value.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive id, `AccountNotFound` when no row
    /// exists, `Database` on store failure.
    pub async fn get_balance(
        &self,
        account_id: AccountId,
    ) -> Result<BalanceSnapshot, LedgerError> {
        validate_account_id(account_id)?;

        let account = accounts::Entity::find_by_id(account_id.value())
            .one(&self.db)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        Ok(BalanceSnapshot {
            account_id,
            balance: round_to_cents(account.balance),
        })
    }

    /// Applies a signed delta to an account balance.
    ///
    /// Positive deltas refill, negative deltas withdraw, zero is a no-op
    /// that still reports the current balance. The read-check-write runs
    /// under a row lock in one transaction, so a concurrent adjustment
    /// cannot slip between the overdraw check and the write.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive id or a delta that would push the
    /// balance past the representable range, `AccountNotFound` when no row
    /// exists, `InsufficientFunds` when the delta would overdraw the
    /// account (nothing is written), `Database` on store failure.
    pub async fn adjust_balance(
        &self,
        account_id: AccountId,
        delta: Decimal,
    ) -> Result<BalanceSnapshot, LedgerError> {
        validate_account_id(account_id)?;

        let txn = self.db.begin().await?;

        let account = lock_account(&txn, account_id).await?;
        let new_balance =
            apply_delta(account.balance, delta).map_err(|e| balance_error(account_id, e))?;

        write_balance(&txn, account, new_balance).await?;
        txn.commit().await?;

        Ok(BalanceSnapshot {
            account_id,
            balance: round_to_cents(new_balance),
        })
    }

    /// Moves `amount` from one account to another atomically.
    ///
    /// Both rows commit together or not at all; no other transaction can
    /// ever observe the debit without the credit.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for non-positive ids, identical accounts, a
    /// non-positive amount, or a credit past the representable range;
    /// `AccountNotFound` when either row is missing; `InsufficientFunds`
    /// when the source balance cannot cover the amount; `Database` on
    /// store failure. All failures leave both balances untouched.
    pub async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<TransferOutcome, LedgerError> {
        validate_transfer(from, to, amount)?;

        let txn = self.db.begin().await?;

        let (first, second) = lock_order(from, to);
        let first_row = lock_account(&txn, first).await?;
        let second_row = lock_account(&txn, second).await?;

        let (from_row, to_row) = if first == from {
            (first_row, second_row)
        } else {
            (second_row, first_row)
        };

        let new_from =
            apply_delta(from_row.balance, -amount).map_err(|e| balance_error(from, e))?;
        let new_to = apply_delta(to_row.balance, amount).map_err(|e| balance_error(to, e))?;

        write_balance(&txn, from_row, new_from).await?;
        write_balance(&txn, to_row, new_to).await?;
        txn.commit().await?;

        Ok(TransferOutcome {
            from: BalanceSnapshot {
                account_id: from,
                balance: round_to_cents(new_from),
            },
            to: BalanceSnapshot {
                account_id: to,
                balance: round_to_cents(new_to),
            },
        })
    }
}

/// Reads one account row under an exclusive row lock.
async fn lock_account(
    txn: &DatabaseTransaction,
    account_id: AccountId,
) -> Result<accounts::Model, LedgerError> {
    accounts::Entity::find_by_id(account_id.value())
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(LedgerError::AccountNotFound(account_id))
}

/// Writes a new balance for a locked row inside the open transaction.
async fn write_balance(
    txn: &DatabaseTransaction,
    account: accounts::Model,
    new_balance: Decimal,
) -> Result<(), DbErr> {
    let mut active: accounts::ActiveModel = account.into();
    active.balance = Set(new_balance);
    active.updated_at = Set(chrono::Utc::now().into());
    active.update(txn).await?;
    Ok(())
}

/// Attaches the account id to a rejection raised by the core balance rules.
fn balance_error(account_id: AccountId, err: BalanceError) -> LedgerError {
    match err {
        BalanceError::InsufficientFunds { balance, requested } => LedgerError::InsufficientFunds {
            account_id,
            balance,
            requested,
        },
        BalanceError::OutOfRange { delta, .. } => {
            LedgerError::InvalidInput(ValidationError::AmountOutOfRange(delta))
        }
    }
}
