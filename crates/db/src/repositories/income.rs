//! Income repository for non-fee revenue.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{income_sources, users};
use crate::repositories::balance::{BalanceError, BalanceRepository};

/// Error types for income operations.
#[derive(Debug, thiserror::Error)]
pub enum IncomeError {
    /// Income amounts must be strictly positive.
    #[error("Income amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// The central balance movement failed.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording income.
#[derive(Debug, Clone)]
pub struct RecordIncomeInput {
    /// Name of the income source.
    pub source_name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Amount received.
    pub amount: Decimal,
    /// Date the income was received.
    pub received_date: NaiveDate,
    /// The finance user recording it.
    pub recorded_by: Uuid,
}

/// An income row joined with its recorder's name.
#[derive(Debug, Clone)]
pub struct IncomeWithRecorder {
    /// The income row.
    pub income: income_sources::Model,
    /// Full name of the recorder.
    pub recorded_by_name: String,
}

/// Outcome of recording income.
#[derive(Debug, Clone)]
pub struct IncomeOutcome {
    /// The income row.
    pub income: income_sources::Model,
    /// Central balance after the credit.
    pub new_balance: Decimal,
}

/// Income repository.
#[derive(Debug, Clone)]
pub struct IncomeRepository {
    db: DatabaseConnection,
}

impl IncomeRepository {
    /// Creates a new income repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an income entry and credits the central balance, in
    /// one database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not strictly positive or a
    /// database operation fails (full rollback).
    pub async fn record(&self, input: RecordIncomeInput) -> Result<IncomeOutcome, IncomeError> {
        if input.amount <= Decimal::ZERO {
            return Err(IncomeError::NonPositiveAmount(input.amount));
        }

        let txn = self.db.begin().await?;

        let income = income_sources::ActiveModel {
            id: Set(Uuid::new_v4()),
            source_name: Set(input.source_name),
            description: Set(input.description),
            amount: Set(input.amount),
            received_date: Set(input.received_date),
            recorded_by: Set(input.recorded_by),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let new_balance = BalanceRepository::credit(&txn, income.amount).await?;

        txn.commit().await?;

        info!(
            income_id = %income.id,
            source = %income.source_name,
            amount = %income.amount,
            %new_balance,
            "recorded income"
        );

        Ok(IncomeOutcome {
            income,
            new_balance,
        })
    }

    /// Lists income entries with recorder names, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<IncomeWithRecorder>, IncomeError> {
        let rows = income_sources::Entity::find()
            .find_also_related(users::Entity)
            .order_by_desc(income_sources::Column::ReceivedDate)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(income, user)| IncomeWithRecorder {
                income,
                recorded_by_name: user.map(|u| u.full_name).unwrap_or_default(),
            })
            .collect())
    }
}
