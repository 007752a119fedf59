//! State transition logic for expense claims.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::expense::error::ExpenseError;
use crate::expense::types::{ExpenseAction, ExpenseStatus};
use crate::role::UserRole;

/// A validated transition, ready to be applied by the database layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseTransition {
    /// Status to store on the claim.
    pub new_status: ExpenseStatus,
    /// The reviewer who drove the transition.
    pub reviewed_by: Uuid,
    /// When the transition was validated.
    pub reviewed_at: DateTime<Utc>,
    /// True when the department budget must be charged for the claim
    /// amount in the same database transaction.
    pub charges_budget: bool,
}

/// Stateless transition table for the expense approval workflow.
pub struct ExpenseWorkflow;

impl ExpenseWorkflow {
    /// Validates that `amount` is acceptable for a new claim.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::NonPositiveAmount` if `amount <= 0`.
    pub fn validate_amount(amount: Decimal) -> Result<(), ExpenseError> {
        if amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount(amount));
        }
        Ok(())
    }

    /// Returns true if `role` may perform `action` at all.
    #[must_use]
    pub const fn role_allows(role: UserRole, action: ExpenseAction) -> bool {
        match action {
            ExpenseAction::DeptApprove => matches!(role, UserRole::DepartmentHead),
            ExpenseAction::FinalApprove => role.is_finance_office(),
            ExpenseAction::Reject => {
                matches!(
                    role,
                    UserRole::DepartmentHead | UserRole::Admin | UserRole::FinanceManager
                )
            }
        }
    }

    /// Applies `action` by `role` to a claim in `current` status.
    ///
    /// The role check runs before the status check, so an unauthorized
    /// reviewer learns nothing about the claim's state.
    ///
    /// # Errors
    ///
    /// * `ExpenseError::RoleNotAllowed` if the role may never perform
    ///   the action.
    /// * `ExpenseError::InvalidTransition` if the action does not apply
    ///   to the current status. In particular a final approval of a
    ///   still-pending claim is rejected; the department stage cannot
    ///   be skipped.
    pub fn apply(
        current: ExpenseStatus,
        action: ExpenseAction,
        role: UserRole,
        reviewed_by: Uuid,
    ) -> Result<ExpenseTransition, ExpenseError> {
        if !Self::role_allows(role, action) {
            return Err(ExpenseError::RoleNotAllowed { role, action });
        }

        let (new_status, charges_budget) = match (current, action) {
            (ExpenseStatus::Pending, ExpenseAction::DeptApprove) => {
                (ExpenseStatus::DeptApproved, false)
            }
            (ExpenseStatus::DeptApproved, ExpenseAction::FinalApprove) => {
                (ExpenseStatus::Approved, true)
            }
            (ExpenseStatus::Pending | ExpenseStatus::DeptApproved, ExpenseAction::Reject) => {
                (ExpenseStatus::Rejected, false)
            }
            _ => return Err(ExpenseError::InvalidTransition { from: current, action }),
        };

        Ok(ExpenseTransition {
            new_status,
            reviewed_by,
            reviewed_at: Utc::now(),
            charges_budget,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn reviewer() -> Uuid {
        Uuid::nil()
    }

    #[test]
    fn test_dept_approve_pending() {
        let t = ExpenseWorkflow::apply(
            ExpenseStatus::Pending,
            ExpenseAction::DeptApprove,
            UserRole::DepartmentHead,
            reviewer(),
        )
        .unwrap();
        assert_eq!(t.new_status, ExpenseStatus::DeptApproved);
        assert!(!t.charges_budget);
    }

    #[test]
    fn test_final_approve_charges_budget() {
        let t = ExpenseWorkflow::apply(
            ExpenseStatus::DeptApproved,
            ExpenseAction::FinalApprove,
            UserRole::FinanceManager,
            reviewer(),
        )
        .unwrap();
        assert_eq!(t.new_status, ExpenseStatus::Approved);
        assert!(t.charges_budget);
    }

    #[test]
    fn test_stage_skip_is_rejected() {
        let err = ExpenseWorkflow::apply(
            ExpenseStatus::Pending,
            ExpenseAction::FinalApprove,
            UserRole::Admin,
            reviewer(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ExpenseError::InvalidTransition {
                from: ExpenseStatus::Pending,
                action: ExpenseAction::FinalApprove,
            }
        );
    }

    #[rstest]
    #[case(ExpenseStatus::Pending, UserRole::DepartmentHead)]
    #[case(ExpenseStatus::Pending, UserRole::Admin)]
    #[case(ExpenseStatus::DeptApproved, UserRole::FinanceManager)]
    fn test_reject_from_reviewable_statuses(
        #[case] current: ExpenseStatus,
        #[case] role: UserRole,
    ) {
        let t = ExpenseWorkflow::apply(current, ExpenseAction::Reject, role, reviewer()).unwrap();
        assert_eq!(t.new_status, ExpenseStatus::Rejected);
        assert!(!t.charges_budget);
    }

    #[rstest]
    #[case(ExpenseStatus::Approved, ExpenseAction::Reject)]
    #[case(ExpenseStatus::Rejected, ExpenseAction::Reject)]
    #[case(ExpenseStatus::Approved, ExpenseAction::FinalApprove)]
    #[case(ExpenseStatus::DeptApproved, ExpenseAction::DeptApprove)]
    fn test_terminal_and_repeated_actions_fail(
        #[case] current: ExpenseStatus,
        #[case] action: ExpenseAction,
    ) {
        let role = match action {
            ExpenseAction::DeptApprove => UserRole::DepartmentHead,
            _ => UserRole::Admin,
        };
        let err = ExpenseWorkflow::apply(current, action, role, reviewer()).unwrap_err();
        assert!(matches!(err, ExpenseError::InvalidTransition { .. }));
    }

    #[rstest]
    #[case(UserRole::Student, ExpenseAction::DeptApprove)]
    #[case(UserRole::Faculty, ExpenseAction::Reject)]
    #[case(UserRole::DepartmentHead, ExpenseAction::FinalApprove)]
    #[case(UserRole::Admin, ExpenseAction::DeptApprove)]
    fn test_role_checks(#[case] role: UserRole, #[case] action: ExpenseAction) {
        let err =
            ExpenseWorkflow::apply(ExpenseStatus::Pending, action, role, reviewer()).unwrap_err();
        assert_eq!(err, ExpenseError::RoleNotAllowed { role, action });
    }

    #[test]
    fn test_validate_amount() {
        assert!(ExpenseWorkflow::validate_amount(dec!(100)).is_ok());
        assert!(ExpenseWorkflow::validate_amount(dec!(0)).is_err());
        assert!(ExpenseWorkflow::validate_amount(dec!(-5)).is_err());
    }
}
