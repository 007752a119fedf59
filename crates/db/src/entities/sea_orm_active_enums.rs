//! Postgres enum types mirrored as `SeaORM` active enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role in the university hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full administrative access.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Finance office manager.
    #[sea_orm(string_value = "finance_manager")]
    FinanceManager,
    /// Department head, first expense approval stage.
    #[sea_orm(string_value = "department_head")]
    DepartmentHead,
    /// Teaching staff.
    #[sea_orm(string_value = "faculty")]
    Faculty,
    /// Non-teaching staff.
    #[sea_orm(string_value = "staff")]
    Staff,
    /// Student.
    #[sea_orm(string_value = "student")]
    Student,
}

/// Payment status of a student fee record.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "fee_status")]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    /// No payment recorded.
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Cumulative payments below the structure amount.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Fully settled.
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Lifecycle of a payment transaction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Gateway payment awaiting approval.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Settled; the balance has been credited.
    #[sea_orm(string_value = "success")]
    Success,
}

/// Settlement status of a payroll entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payroll_status")]
#[serde(rename_all = "lowercase")]
pub enum PayrollStatus {
    /// Generated, not yet disbursed.
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Disbursed.
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Approval status of an expense claim.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "expense_status")]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    /// Awaiting the department head.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Awaiting the finance office.
    #[sea_orm(string_value = "dept_approved")]
    DeptApproved,
    /// Finally approved; the budget has been charged.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected at either stage.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}
