//! Department budget allocation and spend rules.
//!
//! A budget row is keyed by (department, fiscal year). Allocations
//! accumulate within a year and each allocation debits the central
//! funds balance; expense approvals consume the allocation through
//! `spent`.

mod error;
mod service;

pub use error::BudgetError;
pub use service::BudgetService;
