//! Expense workflow error types.

use thiserror::Error;

use crate::expense::types::{ExpenseAction, ExpenseStatus};
use crate::role::UserRole;

/// Errors that can occur while driving the expense workflow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpenseError {
    /// The action is not valid from the claim's current status.
    #[error("Cannot apply {action} to an expense in status {from}")]
    InvalidTransition {
        /// The current status.
        from: ExpenseStatus,
        /// The attempted action.
        action: ExpenseAction,
    },

    /// The reviewer's role may not perform this action.
    #[error("Role {role} is not allowed to perform {action}")]
    RoleNotAllowed {
        /// The reviewer's role.
        role: UserRole,
        /// The attempted action.
        action: ExpenseAction,
    },

    /// The claim amount must be strictly positive.
    #[error("Expense amount must be positive, got {0}")]
    NonPositiveAmount(rust_decimal::Decimal),
}
