//! Payroll repository for monthly salary generation and disbursement.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use unifin_core::payroll::{PayrollError as PayrollRule, PayrollService, PayrollStatus};

use crate::entities::{
    payroll,
    sea_orm_active_enums::{PayrollStatus as DbPayrollStatus, UserRole as DbUserRole},
    users,
};
use crate::repositories::balance::{BalanceError, BalanceRepository};

/// Error types for payroll operations.
#[derive(Debug, thiserror::Error)]
pub enum PayrollError {
    /// Payroll entry not found.
    #[error("Payroll entry not found: {0}")]
    NotFound(Uuid),

    /// The entry is already paid; the balance was not touched.
    #[error("Payroll entry {0} is already paid")]
    AlreadyPaid(Uuid),

    /// The entry is already paid and its amount can no longer change.
    #[error("Payroll entry {0} is paid and cannot be updated")]
    NotUpdatable(Uuid),

    /// Amount failed a payroll rule check.
    #[error(transparent)]
    Rule(#[from] PayrollRule),

    /// The central balance movement failed.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Outcome of a monthly payroll generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOutcome {
    /// Entries created for the month.
    pub created: usize,
    /// Staff skipped because an entry for the month already existed.
    pub skipped: usize,
}

/// Outcome of disbursing one payroll entry.
#[derive(Debug, Clone)]
pub struct PayOutcome {
    /// The entry after disbursement.
    pub entry: payroll::Model,
    /// Central balance after the debit.
    pub new_balance: Decimal,
}

const fn status_to_core(status: &DbPayrollStatus) -> PayrollStatus {
    match status {
        DbPayrollStatus::Unpaid => PayrollStatus::Unpaid,
        DbPayrollStatus::Paid => PayrollStatus::Paid,
    }
}

/// Payroll repository.
#[derive(Debug, Clone)]
pub struct PayrollRepository {
    db: DatabaseConnection,
}

impl PayrollRepository {
    /// Creates a new payroll repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generates unpaid entries for every active staff and faculty
    /// member for the given month.
    ///
    /// Idempotent: staff who already have an entry for the month are
    /// skipped. New entries carry forward the amount of the member's
    /// most recent prior entry, 0 when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn generate_for_month(
        &self,
        month: NaiveDate,
        processed_by: Uuid,
    ) -> Result<GenerateOutcome, PayrollError> {
        let month = PayrollService::normalize_month(month);

        let staff = users::Entity::find()
            .filter(users::Column::IsActive.eq(true))
            .filter(
                users::Column::Role
                    .is_in([DbUserRole::Staff, DbUserRole::Faculty]),
            )
            .all(&self.db)
            .await?;

        let mut created = 0;
        let mut skipped = 0;

        for member in staff {
            let existing = payroll::Entity::find()
                .filter(payroll::Column::StaffId.eq(member.id))
                .filter(payroll::Column::Month.eq(month))
                .one(&self.db)
                .await?;
            if existing.is_some() {
                skipped += 1;
                continue;
            }

            let previous_amount = payroll::Entity::find()
                .filter(payroll::Column::StaffId.eq(member.id))
                .filter(payroll::Column::Month.lt(month))
                .order_by_desc(payroll::Column::Month)
                .one(&self.db)
                .await?
                .map_or(Decimal::ZERO, |p| p.amount);

            let now = Utc::now().into();
            payroll::ActiveModel {
                id: Set(Uuid::new_v4()),
                staff_id: Set(member.id),
                role: Set(member.role),
                month: Set(month),
                amount: Set(previous_amount),
                status: Set(DbPayrollStatus::Unpaid),
                paid_on: Set(None),
                processed_by: Set(Some(processed_by)),
                paid_by: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await?;

            created += 1;
        }

        info!(%month, created, skipped, "generated payroll for month");
        Ok(GenerateOutcome { created, skipped })
    }

    /// Updates the salary amount of an unpaid entry.
    ///
    /// # Errors
    ///
    /// Returns `PayrollError::NotUpdatable` once the entry is paid, or
    /// a rule error for a non-positive amount.
    pub async fn update_amount(
        &self,
        payroll_id: Uuid,
        amount: Decimal,
    ) -> Result<payroll::Model, PayrollError> {
        PayrollService::validate_amount(amount)?;

        let entry = payroll::Entity::find_by_id(payroll_id)
            .one(&self.db)
            .await?
            .ok_or(PayrollError::NotFound(payroll_id))?;

        if entry.status == DbPayrollStatus::Paid {
            return Err(PayrollError::NotUpdatable(payroll_id));
        }

        let mut active: payroll::ActiveModel = entry.into();
        active.amount = Set(amount);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Disburses one payroll entry.
    ///
    /// Runs in one database transaction: the already-paid guard, the
    /// compare-and-swap debit of the central balance, and the status
    /// stamp commit together. Paying the same entry twice fails on the
    /// guard and leaves the balance unchanged.
    ///
    /// # Errors
    ///
    /// Returns `PayrollError::AlreadyPaid` for a settled entry, a
    /// balance error when the funds do not cover the salary, or a
    /// database error (full rollback).
    pub async fn pay(&self, payroll_id: Uuid, paid_by: Uuid) -> Result<PayOutcome, PayrollError> {
        let txn = self.db.begin().await?;

        // Locked read: two concurrent disbursements must serialize on
        // the row so the second one sees `paid` and fails the guard.
        let entry = payroll::Entity::find_by_id(payroll_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PayrollError::NotFound(payroll_id))?;

        PayrollService::ensure_payable(status_to_core(&entry.status))
            .map_err(|_| PayrollError::AlreadyPaid(payroll_id))?;
        PayrollService::validate_amount(entry.amount)?;

        let new_balance = BalanceRepository::try_debit(&txn, entry.amount).await?;

        let amount = entry.amount;
        let mut active: payroll::ActiveModel = entry.into();
        active.status = Set(DbPayrollStatus::Paid);
        active.paid_on = Set(Some(Utc::now().date_naive()));
        active.paid_by = Set(Some(paid_by));
        active.updated_at = Set(Utc::now().into());
        let entry = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            payroll_id = %entry.id,
            %amount,
            %new_balance,
            "paid payroll entry"
        );

        Ok(PayOutcome { entry, new_balance })
    }

    /// Lists payroll entries, optionally restricted to one role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, role: Option<DbUserRole>) -> Result<Vec<payroll::Model>, PayrollError> {
        let mut query = payroll::Entity::find()
            .order_by_desc(payroll::Column::Month)
            .order_by_desc(payroll::Column::CreatedAt);
        if let Some(role) = role {
            query = query.filter(payroll::Column::Role.eq(role));
        }
        Ok(query.all(&self.db).await?)
    }

    /// Lists one staff member's payroll entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn for_staff(&self, staff_id: Uuid) -> Result<Vec<payroll::Model>, PayrollError> {
        Ok(payroll::Entity::find()
            .filter(payroll::Column::StaffId.eq(staff_id))
            .order_by_desc(payroll::Column::Month)
            .all(&self.db)
            .await?)
    }
}
