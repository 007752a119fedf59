//! Movement model over the funds ledger.
//!
//! Mirrors the semantics of the SQL the balance repository executes:
//! credits are unconditional relative increments, debits are
//! compare-and-swap updates that fail without mutation when the balance
//! is insufficient.

use rust_decimal::Decimal;

use super::{LedgerError, validate_amount};

/// A single relative mutation of the funds balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Add funds (income recording, settled fee transactions).
    Credit(Decimal),
    /// Remove funds (budget allocation, payroll settlement).
    Debit(Decimal),
}

impl Movement {
    /// Applies this movement to a balance.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NonPositiveAmount` for a zero or negative
    /// amount, or `LedgerError::InsufficientFunds` when a debit exceeds
    /// the balance. In both cases the balance is unchanged.
    pub fn apply(&self, balance: Decimal) -> Result<Decimal, LedgerError> {
        match *self {
            Self::Credit(amount) => {
                validate_amount(amount)?;
                Ok(balance + amount)
            }
            Self::Debit(amount) => {
                validate_amount(amount)?;
                if amount > balance {
                    return Err(LedgerError::InsufficientFunds {
                        debit: amount,
                        available: balance,
                    });
                }
                Ok(balance - amount)
            }
        }
    }
}

/// Applies a sequence of movements, stopping at the first failure.
///
/// # Errors
///
/// Propagates the first movement error; the returned balance on success
/// is `initial + sum(credits) - sum(debits)`.
pub fn apply_movements(initial: Decimal, movements: &[Movement]) -> Result<Decimal, LedgerError> {
    movements
        .iter()
        .try_fold(initial, |balance, movement| movement.apply(balance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_increases_balance() {
        let result = Movement::Credit(dec!(500)).apply(dec!(100)).unwrap();
        assert_eq!(result, dec!(600));
    }

    #[test]
    fn test_debit_decreases_balance() {
        let result = Movement::Debit(dec!(30)).apply(dec!(100)).unwrap();
        assert_eq!(result, dec!(70));
    }

    #[test]
    fn test_debit_to_exactly_zero_is_allowed() {
        let result = Movement::Debit(dec!(100)).apply(dec!(100)).unwrap();
        assert_eq!(result, Decimal::ZERO);
    }

    #[test]
    fn test_overdraft_leaves_balance_unchanged() {
        let err = Movement::Debit(dec!(101)).apply(dec!(100)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                debit: dec!(101),
                available: dec!(100),
            }
        );
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn movement_strategy() -> impl Strategy<Value = Movement> {
        prop_oneof![
            amount_strategy().prop_map(Movement::Credit),
            amount_strategy().prop_map(Movement::Debit),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// For any applied sequence, the final balance is the initial
        /// balance plus the sum of credits minus the sum of debits.
        #[test]
        fn prop_balance_conservation(
            initial in (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2)),
            movements in prop::collection::vec(movement_strategy(), 0..30),
        ) {
            if let Ok(finale) = apply_movements(initial, &movements) {
                let mut credits = Decimal::ZERO;
                let mut debits = Decimal::ZERO;
                for m in &movements {
                    match m {
                        Movement::Credit(a) => credits += a,
                        Movement::Debit(a) => debits += a,
                    }
                }
                prop_assert_eq!(finale, initial + credits - debits);
            }
        }

        /// No sequence of guarded debits can drive the balance negative.
        #[test]
        fn prop_no_negative_balance(
            initial in (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)),
            movements in prop::collection::vec(movement_strategy(), 0..30),
        ) {
            let mut balance = initial;
            for m in &movements {
                // A failed debit must leave the balance unchanged.
                if let Ok(next) = m.apply(balance) {
                    balance = next;
                }
                prop_assert!(balance >= Decimal::ZERO);
            }
        }
    }
}
