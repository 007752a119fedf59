//! Property tests for the expense workflow transition table.

use proptest::prelude::*;
use uuid::Uuid;

use super::{ExpenseAction, ExpenseStatus, ExpenseWorkflow};
use crate::role::UserRole;

fn action_strategy() -> impl Strategy<Value = ExpenseAction> {
    prop_oneof![
        Just(ExpenseAction::DeptApprove),
        Just(ExpenseAction::FinalApprove),
        Just(ExpenseAction::Reject),
    ]
}

fn role_strategy() -> impl Strategy<Value = UserRole> {
    prop_oneof![
        Just(UserRole::Admin),
        Just(UserRole::FinanceManager),
        Just(UserRole::DepartmentHead),
        Just(UserRole::Faculty),
        Just(UserRole::Staff),
        Just(UserRole::Student),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// No action sequence reaches `Approved` without passing through
    /// `DeptApproved` first.
    #[test]
    fn prop_no_stage_skip(
        steps in prop::collection::vec((action_strategy(), role_strategy()), 1..30),
    ) {
        let mut status = ExpenseStatus::Pending;
        let mut saw_dept_approved = false;
        for (action, role) in steps {
            if let Ok(t) = ExpenseWorkflow::apply(status, action, role, Uuid::nil()) {
                status = t.new_status;
                if status == ExpenseStatus::DeptApproved {
                    saw_dept_approved = true;
                }
                if status == ExpenseStatus::Approved {
                    prop_assert!(saw_dept_approved);
                }
            }
        }
    }

    /// Terminal statuses absorb: once approved or rejected, every
    /// further action fails.
    #[test]
    fn prop_terminal_statuses_absorb(
        action in action_strategy(),
        role in role_strategy(),
    ) {
        for terminal in [ExpenseStatus::Approved, ExpenseStatus::Rejected] {
            prop_assert!(ExpenseWorkflow::apply(terminal, action, role, Uuid::nil()).is_err());
        }
    }

    /// The budget is only ever charged by the final approval.
    #[test]
    fn prop_only_final_approval_charges(
        steps in prop::collection::vec((action_strategy(), role_strategy()), 1..30),
    ) {
        let mut status = ExpenseStatus::Pending;
        for (action, role) in steps {
            if let Ok(t) = ExpenseWorkflow::apply(status, action, role, Uuid::nil()) {
                if t.charges_budget {
                    prop_assert_eq!(action, ExpenseAction::FinalApprove);
                    prop_assert_eq!(t.new_status, ExpenseStatus::Approved);
                }
                status = t.new_status;
            }
        }
    }
}
