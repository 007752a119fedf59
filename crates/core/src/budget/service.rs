//! Budget guard logic shared by allocation and expense approval.

use rust_decimal::Decimal;

use super::BudgetError;

/// Stateless budget rule evaluation.
pub struct BudgetService;

impl BudgetService {
    /// Allocation remaining for a budget row.
    #[must_use]
    pub fn remaining(allocated: Decimal, spent: Decimal) -> Decimal {
        allocated - spent
    }

    /// Validates an allocation amount.
    ///
    /// The sufficiency check against the central balance is performed
    /// by the compare-and-swap debit itself; only the amount shape is
    /// checked here.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NonPositiveAmount` if `amount <= 0`.
    pub fn validate_allocation(amount: Decimal) -> Result<(), BudgetError> {
        if amount <= Decimal::ZERO {
            return Err(BudgetError::NonPositiveAmount(amount));
        }
        Ok(())
    }

    /// Validates a spend against the department's remaining allocation.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NonPositiveAmount` if `amount <= 0`, or
    /// `BudgetError::ExceedsRemaining` when `amount` is larger than
    /// `allocated - spent`.
    pub fn validate_spend(
        allocated: Decimal,
        spent: Decimal,
        amount: Decimal,
    ) -> Result<(), BudgetError> {
        if amount <= Decimal::ZERO {
            return Err(BudgetError::NonPositiveAmount(amount));
        }

        let remaining = Self::remaining(allocated, spent);
        if amount > remaining {
            return Err(BudgetError::ExceedsRemaining { amount, remaining });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_remaining() {
        assert_eq!(BudgetService::remaining(dec!(20000), dec!(5000)), dec!(15000));
        assert_eq!(BudgetService::remaining(dec!(100), dec!(100)), dec!(0));
    }

    #[test]
    fn test_validate_allocation() {
        assert!(BudgetService::validate_allocation(dec!(20000)).is_ok());
        assert!(matches!(
            BudgetService::validate_allocation(dec!(0)),
            Err(BudgetError::NonPositiveAmount(_))
        ));
        assert!(matches!(
            BudgetService::validate_allocation(dec!(-1)),
            Err(BudgetError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_validate_spend_within_remaining() {
        assert!(BudgetService::validate_spend(dec!(20000), dec!(5000), dec!(15000)).is_ok());
    }

    #[test]
    fn test_validate_spend_exceeds_remaining() {
        let err = BudgetService::validate_spend(dec!(20000), dec!(5000), dec!(15001)).unwrap_err();
        assert_eq!(
            err,
            BudgetError::ExceedsRemaining {
                amount: dec!(15001),
                remaining: dec!(15000),
            }
        );
    }
}
