//! Expense repository for the two-stage approval workflow.
//!
//! The transition table itself lives in `unifin_core::expense`; this
//! repository loads the claim, runs the table, and persists the
//! allowed transition. The final approval additionally charges the
//! owning department's budget in the same database transaction.

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use unifin_core::expense::{
    ExpenseAction, ExpenseError as ExpenseRule, ExpenseStatus, ExpenseWorkflow,
};
use unifin_core::role::UserRole;

use crate::entities::{
    departments, expenses, sea_orm_active_enums::ExpenseStatus as DbExpenseStatus,
};
use crate::repositories::budget::{BudgetError, BudgetRepository};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Expense claim not found.
    #[error("Expense not found: {0}")]
    NotFound(Uuid),

    /// Department not found.
    #[error("Department not found: {0}")]
    DepartmentNotFound(Uuid),

    /// The claim belongs to a department the reviewer does not head.
    #[error("Expense {0} belongs to a different department")]
    WrongDepartment(Uuid),

    /// The transition table rejected the action.
    #[error(transparent)]
    Rule(#[from] ExpenseRule),

    /// The budget charge for a final approval failed.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// An expense claim joined with its department name.
#[derive(Debug, Clone)]
pub struct ExpenseWithDepartment {
    /// The claim.
    pub expense: expenses::Model,
    /// Department name.
    pub department_name: String,
}

const fn status_to_db(status: ExpenseStatus) -> DbExpenseStatus {
    match status {
        ExpenseStatus::Pending => DbExpenseStatus::Pending,
        ExpenseStatus::DeptApproved => DbExpenseStatus::DeptApproved,
        ExpenseStatus::Approved => DbExpenseStatus::Approved,
        ExpenseStatus::Rejected => DbExpenseStatus::Rejected,
    }
}

const fn status_to_core(status: &DbExpenseStatus) -> ExpenseStatus {
    match status {
        DbExpenseStatus::Pending => ExpenseStatus::Pending,
        DbExpenseStatus::DeptApproved => ExpenseStatus::DeptApproved,
        DbExpenseStatus::Approved => ExpenseStatus::Approved,
        DbExpenseStatus::Rejected => ExpenseStatus::Rejected,
    }
}

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Submits a new expense claim in `pending` status.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not strictly positive, the
    /// department does not exist, or the insert fails.
    pub async fn submit(
        &self,
        department_id: Uuid,
        amount: Decimal,
        description: String,
        submitted_by: Uuid,
    ) -> Result<expenses::Model, ExpenseError> {
        ExpenseWorkflow::validate_amount(amount)?;

        let _department = departments::Entity::find_by_id(department_id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::DepartmentNotFound(department_id))?;

        let claim = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            department_id: Set(department_id),
            amount: Set(amount),
            description: Set(description),
            submitted_by: Set(submitted_by),
            status: Set(DbExpenseStatus::Pending),
            submitted_at: Set(Utc::now().into()),
            dept_approved_by: Set(None),
            dept_approved_at: Set(None),
            finance_approved_by: Set(None),
            finance_approved_at: Set(None),
            rejected_by: Set(None),
            rejected_at: Set(None),
            rejection_reason: Set(None),
        };

        Ok(claim.insert(&self.db).await?)
    }

    /// Applies a review action to a claim.
    ///
    /// The final approval charges the department's budget for the
    /// current fiscal year in the same database transaction; the
    /// charge and the status change commit or roll back together.
    ///
    /// A department-head review is scoped to the head's own
    /// department through `department_scope`; finance reviews pass
    /// `None` and see every claim.
    ///
    /// # Errors
    ///
    /// Returns an error if the claim does not exist, the claim is
    /// outside `department_scope`, the transition table rejects the
    /// action (wrong role, wrong state, or a stage skip), or the
    /// budget charge fails.
    pub async fn review(
        &self,
        expense_id: Uuid,
        action: ExpenseAction,
        role: UserRole,
        reviewer: Uuid,
        department_scope: Option<Uuid>,
        rejection_reason: Option<String>,
    ) -> Result<expenses::Model, ExpenseError> {
        let txn = self.db.begin().await?;

        // The claim is read under a row lock inside the transaction so
        // a concurrent review cannot pass the transition table against
        // the same stale status and, on final approval, charge the
        // budget twice.
        let claim = expenses::Entity::find_by_id(expense_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ExpenseError::NotFound(expense_id))?;

        if let Some(department_id) = department_scope {
            if claim.department_id != department_id {
                return Err(ExpenseError::WrongDepartment(expense_id));
            }
        }

        let transition =
            ExpenseWorkflow::apply(status_to_core(&claim.status), action, role, reviewer)?;

        if transition.charges_budget {
            let fiscal_year = Utc::now().year();
            BudgetRepository::record_spend(&txn, claim.department_id, fiscal_year, claim.amount)
                .await?;
        }

        let stamp = transition.reviewed_at.into();
        let mut active: expenses::ActiveModel = claim.into();
        active.status = Set(status_to_db(transition.new_status));
        match action {
            ExpenseAction::DeptApprove => {
                active.dept_approved_by = Set(Some(reviewer));
                active.dept_approved_at = Set(Some(stamp));
            }
            ExpenseAction::FinalApprove => {
                active.finance_approved_by = Set(Some(reviewer));
                active.finance_approved_at = Set(Some(stamp));
            }
            ExpenseAction::Reject => {
                active.rejected_by = Set(Some(reviewer));
                active.rejected_at = Set(Some(stamp));
                active.rejection_reason = Set(rejection_reason);
            }
        }
        let claim = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            expense_id = %claim.id,
            action = %action,
            status = %transition.new_status,
            "reviewed expense claim"
        );
        Ok(claim)
    }

    /// Lists claims in a status, newest first, with department names.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_status(
        &self,
        status: DbExpenseStatus,
    ) -> Result<Vec<ExpenseWithDepartment>, ExpenseError> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::Status.eq(status))
            .find_also_related(departments::Entity)
            .order_by_desc(expenses::Column::SubmittedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(expense, department)| ExpenseWithDepartment {
                expense,
                department_name: department.map(|d| d.name).unwrap_or_default(),
            })
            .collect())
    }

    /// Lists one department's claims, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_department(
        &self,
        department_id: Uuid,
    ) -> Result<Vec<expenses::Model>, ExpenseError> {
        Ok(expenses::Entity::find()
            .filter(expenses::Column::DepartmentId.eq(department_id))
            .order_by_desc(expenses::Column::SubmittedAt)
            .all(&self.db)
            .await?)
    }

    /// Lists one submitter's claims, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_submitter(
        &self,
        submitted_by: Uuid,
    ) -> Result<Vec<expenses::Model>, ExpenseError> {
        Ok(expenses::Entity::find()
            .filter(expenses::Column::SubmittedBy.eq(submitted_by))
            .order_by_desc(expenses::Column::SubmittedAt)
            .all(&self.db)
            .await?)
    }
}
