//! Error types for budget rules.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error types for budget operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Allocation and spend amounts must be strictly positive.
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// A spend would exceed the department's remaining allocation.
    #[error("spend of {amount} exceeds remaining budget {remaining}")]
    ExceedsRemaining {
        /// The requested spend amount.
        amount: Decimal,
        /// Allocation remaining for the fiscal year.
        remaining: Decimal,
    },
}
