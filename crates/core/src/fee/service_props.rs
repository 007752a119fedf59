//! Property tests for the fee payment state machine.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{FeeService, FeeStatus};

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// `amount_paid` is non-decreasing across any payment sequence.
    #[test]
    fn prop_amount_paid_monotonic(
        structure_amount in amount_strategy(),
        payments in prop::collection::vec(amount_strategy(), 1..20),
    ) {
        let mut paid = Decimal::ZERO;
        for payment in payments {
            let outcome = FeeService::apply_payment(paid, payment, structure_amount).unwrap();
            prop_assert!(outcome.amount_paid > paid);
            paid = outcome.amount_paid;
        }
    }

    /// Status only moves forward: unpaid -> partial -> paid, never back.
    #[test]
    fn prop_status_monotonic(
        structure_amount in amount_strategy(),
        payments in prop::collection::vec(amount_strategy(), 1..20),
    ) {
        let mut paid = Decimal::ZERO;
        let mut status = FeeStatus::Unpaid;
        for payment in payments {
            let outcome = FeeService::apply_payment(paid, payment, structure_amount).unwrap();
            prop_assert!(outcome.status.rank() >= status.rank());
            paid = outcome.amount_paid;
            status = outcome.status;
        }
    }

    /// Once the cumulative total covers the structure amount, the
    /// derived status is paid, including on overpayment.
    #[test]
    fn prop_covering_total_is_paid(
        structure_amount in amount_strategy(),
        excess in (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)),
    ) {
        let status = FeeService::derive_status(structure_amount + excess, structure_amount);
        prop_assert_eq!(status, FeeStatus::Paid);
    }

    /// Provisional (gateway) payments never settle a record on their
    /// own, regardless of amount.
    #[test]
    fn prop_provisional_never_settles(
        current in (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)),
        payment in amount_strategy(),
    ) {
        let outcome = FeeService::apply_provisional_payment(current, payment).unwrap();
        prop_assert_eq!(outcome.status, FeeStatus::Partial);
    }

    /// Approval settles a record exactly when the stored total covers
    /// the structure amount.
    #[test]
    fn prop_settlement_threshold(
        amount_paid in (0i64..2_000_000i64).prop_map(|n| Decimal::new(n, 2)),
        structure_amount in amount_strategy(),
    ) {
        let settled = FeeService::settled_status(FeeStatus::Partial, amount_paid, structure_amount);
        if amount_paid >= structure_amount {
            prop_assert_eq!(settled, FeeStatus::Paid);
        } else {
            prop_assert_eq!(settled, FeeStatus::Partial);
        }
    }
}
