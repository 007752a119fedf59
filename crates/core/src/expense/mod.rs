//! Expense approval workflow.
//!
//! Expense claims flow through a two-stage approval:
//!
//! ```text
//! pending --DeptApprove--> dept_approved --FinalApprove--> approved
//!    |                          |
//!    +--------Reject------------+--------> rejected
//! ```
//!
//! Stage skipping is not allowed: a pending claim can never be finally
//! approved without the department head's sign-off. Approved and
//! rejected are terminal.

mod error;
mod service;
mod types;

pub use error::ExpenseError;
pub use service::{ExpenseTransition, ExpenseWorkflow};
pub use types::{ExpenseAction, ExpenseStatus};

#[cfg(test)]
#[path = "service_props.rs"]
mod service_props;
