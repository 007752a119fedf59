//! Fee payment application rules.

use rust_decimal::Decimal;

use super::{FeeError, FeeStatus};

/// Result of applying a payment to a fee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// Cumulative amount paid after the payment.
    pub amount_paid: Decimal,
    /// Derived status after the payment.
    pub status: FeeStatus,
}

/// Stateless fee payment state machine.
pub struct FeeService;

impl FeeService {
    /// Derives the status of a fee record from its cumulative payments.
    ///
    /// Overpayment still resolves to `Paid`; there is no separate
    /// overpaid state.
    #[must_use]
    pub fn derive_status(amount_paid: Decimal, structure_amount: Decimal) -> FeeStatus {
        if amount_paid >= structure_amount {
            FeeStatus::Paid
        } else if amount_paid > Decimal::ZERO {
            FeeStatus::Partial
        } else {
            FeeStatus::Unpaid
        }
    }

    /// Applies an immediately settled payment (admin-recorded).
    ///
    /// # Errors
    ///
    /// Returns `FeeError::NonPositiveAmount` if `amount <= 0`.
    pub fn apply_payment(
        current_paid: Decimal,
        amount: Decimal,
        structure_amount: Decimal,
    ) -> Result<PaymentOutcome, FeeError> {
        if amount <= Decimal::ZERO {
            return Err(FeeError::NonPositiveAmount(amount));
        }

        let amount_paid = current_paid + amount;
        Ok(PaymentOutcome {
            amount_paid,
            status: Self::derive_status(amount_paid, structure_amount),
        })
    }

    /// Applies a gateway payment that is still awaiting approval.
    ///
    /// The paid total advances immediately, but the record is frozen at
    /// `Partial` even when the total reaches the structure amount:
    /// settlement is not final until an approver confirms it.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::NonPositiveAmount` if `amount <= 0`.
    pub fn apply_provisional_payment(
        current_paid: Decimal,
        amount: Decimal,
    ) -> Result<PaymentOutcome, FeeError> {
        if amount <= Decimal::ZERO {
            return Err(FeeError::NonPositiveAmount(amount));
        }

        Ok(PaymentOutcome {
            amount_paid: current_paid + amount,
            status: FeeStatus::Partial,
        })
    }

    /// Status to settle a record at when a pending transaction is
    /// approved: promoted to `Paid` only if the already-recorded total
    /// covers the structure amount, otherwise left as stored.
    #[must_use]
    pub fn settled_status(
        stored: FeeStatus,
        amount_paid: Decimal,
        structure_amount: Decimal,
    ) -> FeeStatus {
        if amount_paid >= structure_amount {
            FeeStatus::Paid
        } else {
            stored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_derive_status_unpaid() {
        assert_eq!(
            FeeService::derive_status(dec!(0), dec!(10000)),
            FeeStatus::Unpaid
        );
    }

    #[test]
    fn test_derive_status_partial() {
        assert_eq!(
            FeeService::derive_status(dec!(4000), dec!(10000)),
            FeeStatus::Partial
        );
    }

    #[test]
    fn test_derive_status_paid_exact() {
        assert_eq!(
            FeeService::derive_status(dec!(10000), dec!(10000)),
            FeeStatus::Paid
        );
    }

    #[test]
    fn test_derive_status_overpaid_is_paid() {
        assert_eq!(
            FeeService::derive_status(dec!(12000), dec!(10000)),
            FeeStatus::Paid
        );
    }

    #[test]
    fn test_apply_payment_full_settlement() {
        let outcome = FeeService::apply_payment(dec!(0), dec!(10000), dec!(10000)).unwrap();
        assert_eq!(outcome.amount_paid, dec!(10000));
        assert_eq!(outcome.status, FeeStatus::Paid);
    }

    #[test]
    fn test_apply_payment_partial() {
        let outcome = FeeService::apply_payment(dec!(0), dec!(2500), dec!(10000)).unwrap();
        assert_eq!(outcome.amount_paid, dec!(2500));
        assert_eq!(outcome.status, FeeStatus::Partial);
    }

    #[test]
    fn test_apply_payment_rejects_non_positive() {
        assert!(matches!(
            FeeService::apply_payment(dec!(0), dec!(0), dec!(10000)),
            Err(FeeError::NonPositiveAmount(_))
        ));
        assert!(matches!(
            FeeService::apply_payment(dec!(0), dec!(-100), dec!(10000)),
            Err(FeeError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_provisional_payment_freezes_at_partial() {
        // Covering amount, but settlement is not final until approved.
        let outcome = FeeService::apply_provisional_payment(dec!(0), dec!(10000)).unwrap();
        assert_eq!(outcome.amount_paid, dec!(10000));
        assert_eq!(outcome.status, FeeStatus::Partial);
    }

    #[test]
    fn test_settled_status_promotes_covered_record() {
        assert_eq!(
            FeeService::settled_status(FeeStatus::Partial, dec!(10000), dec!(10000)),
            FeeStatus::Paid
        );
    }

    #[test]
    fn test_settled_status_keeps_uncovered_record() {
        assert_eq!(
            FeeService::settled_status(FeeStatus::Partial, dec!(4000), dec!(10000)),
            FeeStatus::Partial
        );
    }
}
