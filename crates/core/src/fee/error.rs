//! Error types for fee payment rules.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error types for fee payment operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeError {
    /// Payment amounts must be strictly positive.
    #[error("payment amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
}
