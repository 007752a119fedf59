//! Expense workflow domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Approval status of an expense claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    /// Submitted, awaiting the department head.
    Pending,
    /// Signed off by the department head, awaiting the finance office.
    DeptApproved,
    /// Finally approved; the department budget has been charged.
    Approved,
    /// Rejected at either stage. Terminal.
    Rejected,
}

impl ExpenseStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::DeptApproved => "dept_approved",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "dept_approved" => Some(Self::DeptApproved),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true for statuses with no further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An action a reviewer can take on an expense claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseAction {
    /// First-stage sign-off by the department head.
    DeptApprove,
    /// Final sign-off by the finance office; charges the budget.
    FinalApprove,
    /// Rejection at either stage.
    Reject,
}

impl ExpenseAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DeptApprove => "dept_approve",
            Self::FinalApprove => "final_approve",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for ExpenseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            ExpenseStatus::Pending,
            ExpenseStatus::DeptApproved,
            ExpenseStatus::Approved,
            ExpenseStatus::Rejected,
        ] {
            assert_eq!(ExpenseStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ExpenseStatus::parse("draft"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!ExpenseStatus::Pending.is_terminal());
        assert!(!ExpenseStatus::DeptApproved.is_terminal());
        assert!(ExpenseStatus::Approved.is_terminal());
        assert!(ExpenseStatus::Rejected.is_terminal());
    }
}
