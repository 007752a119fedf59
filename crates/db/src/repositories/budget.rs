//! Budget repository for department budget allocation and spend.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use unifin_core::budget::{BudgetError as BudgetRule, BudgetService};

use crate::entities::{department_budgets, departments};
use crate::repositories::balance::{BalanceError, BalanceRepository};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Department not found.
    #[error("Department not found: {0}")]
    DepartmentNotFound(Uuid),

    /// No budget row exists for the department and fiscal year.
    #[error("No budget allocated for department {department_id} in {fiscal_year}")]
    BudgetNotFound {
        /// The department.
        department_id: Uuid,
        /// The fiscal year.
        fiscal_year: i32,
    },

    /// Amount failed a budget rule check.
    #[error(transparent)]
    Rule(#[from] BudgetRule),

    /// The central balance movement failed.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Outcome of a budget allocation.
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    /// The budget row after the allocation.
    pub budget: department_budgets::Model,
    /// Central balance after the debit.
    pub remaining_funds: Decimal,
}

/// A budget row joined with its department name.
#[derive(Debug, Clone)]
pub struct BudgetWithDepartment {
    /// Budget record.
    pub budget: department_budgets::Model,
    /// Department name.
    pub department_name: String,
}

/// One row of the per-department budget summary.
#[derive(Debug, Clone)]
pub struct BudgetSummaryRow {
    /// The department.
    pub department_id: Uuid,
    /// Department name.
    pub department_name: String,
    /// Fiscal year the summary covers.
    pub fiscal_year: i32,
    /// Total allocated, 0 when no budget row exists.
    pub allocated: Decimal,
    /// Total spent, 0 when no budget row exists.
    pub spent: Decimal,
    /// Allocation remaining.
    pub remaining: Decimal,
}

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Allocates `amount` to a department for a fiscal year.
    ///
    /// Runs in one database transaction: the central balance is
    /// debited with a compare-and-swap, then the budget row is
    /// upserted with `allocated` incremented. Any failure rolls the
    /// whole allocation back.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is not strictly positive
    /// - The department does not exist
    /// - The central balance does not cover the amount
    /// - A database operation fails
    pub async fn allocate(
        &self,
        department_id: Uuid,
        amount: Decimal,
        fiscal_year: i32,
    ) -> Result<AllocationOutcome, BudgetError> {
        BudgetService::validate_allocation(amount)?;

        let department = departments::Entity::find_by_id(department_id)
            .one(&self.db)
            .await?
            .ok_or(BudgetError::DepartmentNotFound(department_id))?;

        let txn = self.db.begin().await?;

        let remaining_funds = BalanceRepository::try_debit(&txn, amount).await?;

        let now = Utc::now().into();
        let existing = department_budgets::Entity::find()
            .filter(department_budgets::Column::DepartmentId.eq(department_id))
            .filter(department_budgets::Column::FiscalYear.eq(fiscal_year))
            .one(&txn)
            .await?;

        let budget = match existing {
            Some(row) => {
                let allocated = row.allocated + amount;
                let mut active: department_budgets::ActiveModel = row.into();
                active.allocated = Set(allocated);
                active.updated_at = Set(now);
                active.update(&txn).await?
            }
            None => {
                department_budgets::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    department_id: Set(department_id),
                    fiscal_year: Set(fiscal_year),
                    allocated: Set(amount),
                    spent: Set(Decimal::ZERO),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await?
            }
        };

        txn.commit().await?;

        info!(
            department = %department.name,
            %amount,
            fiscal_year,
            allocated = %budget.allocated,
            %remaining_funds,
            "allocated department budget"
        );

        Ok(AllocationOutcome {
            budget,
            remaining_funds,
        })
    }

    /// Records a spend against a department's budget inside a
    /// caller-provided transaction.
    ///
    /// Used by the final expense approval so the budget charge commits
    /// or rolls back together with the status change.
    ///
    /// # Errors
    ///
    /// Returns an error if no budget row exists for the department and
    /// fiscal year, or the remaining allocation does not cover the
    /// amount.
    pub async fn record_spend<C: ConnectionTrait>(
        conn: &C,
        department_id: Uuid,
        fiscal_year: i32,
        amount: Decimal,
    ) -> Result<department_budgets::Model, BudgetError> {
        let row = department_budgets::Entity::find()
            .filter(department_budgets::Column::DepartmentId.eq(department_id))
            .filter(department_budgets::Column::FiscalYear.eq(fiscal_year))
            .one(conn)
            .await?
            .ok_or(BudgetError::BudgetNotFound {
                department_id,
                fiscal_year,
            })?;

        BudgetService::validate_spend(row.allocated, row.spent, amount)?;

        let spent = row.spent + amount;
        let mut active: department_budgets::ActiveModel = row.into();
        active.spent = Set(spent);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(conn).await?)
    }

    /// Lists all budget rows with department names, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<BudgetWithDepartment>, BudgetError> {
        let rows = department_budgets::Entity::find()
            .find_also_related(departments::Entity)
            .order_by_desc(department_budgets::Column::UpdatedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(budget, department)| BudgetWithDepartment {
                budget,
                department_name: department.map(|d| d.name).unwrap_or_default(),
            })
            .collect())
    }

    /// Summarizes budgets for a fiscal year across all departments.
    ///
    /// Departments without a budget row appear with zero allocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn summary(&self, fiscal_year: i32) -> Result<Vec<BudgetSummaryRow>, BudgetError> {
        let all_departments = departments::Entity::find()
            .order_by_asc(departments::Column::Name)
            .all(&self.db)
            .await?;

        let budgets = department_budgets::Entity::find()
            .filter(department_budgets::Column::FiscalYear.eq(fiscal_year))
            .all(&self.db)
            .await?;

        let mut rows = Vec::with_capacity(all_departments.len());
        for department in all_departments {
            let (allocated, spent) = budgets
                .iter()
                .find(|b| b.department_id == department.id)
                .map_or((Decimal::ZERO, Decimal::ZERO), |b| (b.allocated, b.spent));

            rows.push(BudgetSummaryRow {
                department_id: department.id,
                department_name: department.name,
                fiscal_year,
                allocated,
                spent,
                remaining: BudgetService::remaining(allocated, spent),
            });
        }

        Ok(rows)
    }
}
