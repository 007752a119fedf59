//! User roles and the authorization groups used by the ledger operations.

use serde::{Deserialize, Serialize};

/// User role in the university hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full administrative access.
    Admin,
    /// Manages the finance office: fees, payroll, budgets, approvals.
    FinanceManager,
    /// Head of a department; first approval stage for expenses.
    DepartmentHead,
    /// Teaching staff; can submit expense claims and is on payroll.
    Faculty,
    /// Non-teaching staff; on payroll.
    Staff,
    /// Student; owns fee records and initiates gateway payments.
    Student,
}

impl UserRole {
    /// Parses a role from its wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "finance_manager" => Some(Self::FinanceManager),
            "department_head" => Some(Self::DepartmentHead),
            "faculty" => Some(Self::Faculty),
            "staff" => Some(Self::Staff),
            "student" => Some(Self::Student),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::FinanceManager => "finance_manager",
            Self::DepartmentHead => "department_head",
            Self::Faculty => "faculty",
            Self::Staff => "staff",
            Self::Student => "student",
        }
    }

    /// Returns true for roles that draw a monthly payroll.
    #[must_use]
    pub const fn is_on_payroll(&self) -> bool {
        matches!(self, Self::Staff | Self::Faculty)
    }

    /// Returns true for the finance-office roles that may finalize
    /// monetary operations (record transactions, approve settlements,
    /// allocate budgets, pay payroll).
    #[must_use]
    pub const fn is_finance_office(&self) -> bool {
        matches!(self, Self::Admin | Self::FinanceManager)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for role in [
            UserRole::Admin,
            UserRole::FinanceManager,
            UserRole::DepartmentHead,
            UserRole::Faculty,
            UserRole::Staff,
            UserRole::Student,
        ] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("invalid"), None);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(UserRole::parse("ADMIN"), Some(UserRole::Admin));
        assert_eq!(
            UserRole::parse("Finance_Manager"),
            Some(UserRole::FinanceManager)
        );
    }

    #[test]
    fn test_payroll_roles() {
        assert!(UserRole::Staff.is_on_payroll());
        assert!(UserRole::Faculty.is_on_payroll());
        assert!(!UserRole::Student.is_on_payroll());
        assert!(!UserRole::Admin.is_on_payroll());
    }

    #[test]
    fn test_finance_office_roles() {
        assert!(UserRole::Admin.is_finance_office());
        assert!(UserRole::FinanceManager.is_finance_office());
        assert!(!UserRole::DepartmentHead.is_finance_office());
        assert!(!UserRole::Faculty.is_finance_office());
    }
}
