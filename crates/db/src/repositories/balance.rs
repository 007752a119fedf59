//! Balance repository for the central finance balance singleton.
//!
//! All mutations are relative and atomic. The debit path is a
//! compare-and-swap: the sufficiency check and the subtraction happen
//! in one `UPDATE` statement, so concurrent debits can never drive the
//! balance negative.

use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait, Statement};
use tracing::debug;
use unifin_core::ledger::{self, LedgerError};

use crate::entities::finance_balance;

/// Error types for balance operations.
#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    /// The singleton row is missing; the schema was not migrated.
    #[error("Finance balance row is missing")]
    Missing,

    /// Amounts applied to the ledger must be strictly positive.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// The debit would overdraw the balance. Nothing was mutated.
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// The requested debit amount.
        requested: Decimal,
        /// The balance at the time of the failed debit.
        available: Decimal,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LedgerError> for BalanceError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NonPositiveAmount(amount) => Self::NonPositiveAmount(amount),
            LedgerError::InsufficientFunds { debit, available } => Self::InsufficientFunds {
                requested: debit,
                available,
            },
        }
    }
}

const CREDIT_SQL: &str = "UPDATE finance_balance \
     SET total_amount = total_amount + $1, updated_at = now() \
     WHERE id = 1 \
     RETURNING total_amount";

const DEBIT_SQL: &str = "UPDATE finance_balance \
     SET total_amount = total_amount - $1, updated_at = now() \
     WHERE id = 1 AND total_amount >= $1 \
     RETURNING total_amount";

/// Repository for the central balance.
///
/// `credit` and `try_debit` are associated functions over any
/// [`ConnectionTrait`] so other repositories can fold a balance
/// movement into their own database transaction.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reads the current balance.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::Missing` if the singleton row does not
    /// exist, or a database error.
    pub async fn read(&self) -> Result<Decimal, BalanceError> {
        Self::read_with(&self.db).await
    }

    /// Reads the current balance through a caller-provided connection.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::Missing` if the singleton row does not
    /// exist, or a database error.
    pub async fn read_with<C: ConnectionTrait>(conn: &C) -> Result<Decimal, BalanceError> {
        finance_balance::Entity::find_by_id(1i16)
            .one(conn)
            .await?
            .map(|row| row.total_amount)
            .ok_or(BalanceError::Missing)
    }

    /// Credits the balance by `amount`, returning the new balance.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::NonPositiveAmount` for `amount <= 0`,
    /// `BalanceError::Missing` if the singleton row does not exist, or
    /// a database error.
    pub async fn credit<C: ConnectionTrait>(
        conn: &C,
        amount: Decimal,
    ) -> Result<Decimal, BalanceError> {
        ledger::validate_amount(amount)?;

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, CREDIT_SQL, [amount.into()]);
        let row = conn.query_one(stmt).await?.ok_or(BalanceError::Missing)?;
        let balance: Decimal = row.try_get("", "total_amount")?;

        debug!(%amount, %balance, "credited central balance");
        Ok(balance)
    }

    /// Debits the balance by `amount` if and only if the funds cover
    /// it, returning the new balance.
    ///
    /// The sufficiency check is part of the `UPDATE` predicate; a
    /// failed debit touches nothing.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::NonPositiveAmount` for `amount <= 0`,
    /// `BalanceError::InsufficientFunds` when the balance does not
    /// cover `amount`, or a database error.
    pub async fn try_debit<C: ConnectionTrait>(
        conn: &C,
        amount: Decimal,
    ) -> Result<Decimal, BalanceError> {
        ledger::validate_amount(amount)?;

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, DEBIT_SQL, [amount.into()]);
        match conn.query_one(stmt).await? {
            Some(row) => {
                let balance: Decimal = row.try_get("", "total_amount")?;
                debug!(%amount, %balance, "debited central balance");
                Ok(balance)
            }
            None => {
                let available = Self::read_with(conn).await?;
                Err(BalanceError::InsufficientFunds {
                    requested: amount,
                    available,
                })
            }
        }
    }
}
