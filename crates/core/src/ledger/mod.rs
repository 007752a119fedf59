//! Balance movement rules for the organization-wide funds ledger.
//!
//! The ledger itself is a single database row mutated only through
//! relative updates; this module holds the pure rules those updates
//! must obey and a movement model used to state conservation
//! properties in tests.

mod movement;

pub use movement::{Movement, apply_movements};

use rust_decimal::Decimal;
use thiserror::Error;

/// Error types for ledger amount validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Amounts moved through the ledger must be strictly positive.
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// A debit would take the balance below zero.
    #[error("debit of {debit} exceeds available balance {available}")]
    InsufficientFunds {
        /// The requested debit amount.
        debit: Decimal,
        /// The balance available at the time of the check.
        available: Decimal,
    },
}

/// Validates an amount for a credit or debit.
///
/// Zero and negative amounts are rejected; a zero movement is always a
/// caller bug and a negative one would invert the operation.
///
/// # Errors
///
/// Returns `LedgerError::NonPositiveAmount` if `amount <= 0`.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_amount_is_valid() {
        assert!(validate_amount(dec!(0.01)).is_ok());
        assert!(validate_amount(dec!(100000)).is_ok());
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        assert_eq!(
            validate_amount(Decimal::ZERO),
            Err(LedgerError::NonPositiveAmount(Decimal::ZERO))
        );
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        assert!(matches!(
            validate_amount(dec!(-5)),
            Err(LedgerError::NonPositiveAmount(_))
        ));
    }
}
