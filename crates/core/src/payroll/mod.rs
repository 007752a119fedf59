//! Payroll settlement guards.
//!
//! A payroll entry is generated unpaid for an employee and a month,
//! then settled exactly once against the central balance.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Settlement status of a payroll entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayrollStatus {
    /// Generated, not yet disbursed.
    Unpaid,
    /// Disbursed. Terminal.
    Paid,
}

impl PayrollStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unpaid" => Some(Self::Unpaid),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised by the payroll guards.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayrollError {
    /// The entry has already been disbursed.
    #[error("Payroll entry is already paid")]
    AlreadyPaid,

    /// Salary amounts must be strictly positive.
    #[error("Salary amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
}

/// Stateless guard rules for payroll settlement.
pub struct PayrollService;

impl PayrollService {
    /// Normalizes any date within a month to the first of that month.
    ///
    /// Payroll entries are keyed by (employee, month); storing the
    /// first of the month makes the uniqueness constraint exact.
    #[must_use]
    pub fn normalize_month(date: NaiveDate) -> NaiveDate {
        date.with_day(1).unwrap_or(date)
    }

    /// Validates a salary amount for generation or update.
    ///
    /// # Errors
    ///
    /// Returns `PayrollError::NonPositiveAmount` if `amount <= 0`.
    pub fn validate_amount(amount: Decimal) -> Result<(), PayrollError> {
        if amount <= Decimal::ZERO {
            return Err(PayrollError::NonPositiveAmount(amount));
        }
        Ok(())
    }

    /// Checks that an entry can still be disbursed.
    ///
    /// Paying is idempotence-guarded: a second disbursement attempt
    /// fails here instead of debiting the balance twice.
    ///
    /// # Errors
    ///
    /// Returns `PayrollError::AlreadyPaid` if the entry is settled.
    pub fn ensure_payable(status: PayrollStatus) -> Result<(), PayrollError> {
        match status {
            PayrollStatus::Unpaid => Ok(()),
            PayrollStatus::Paid => Err(PayrollError::AlreadyPaid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_parse() {
        assert_eq!(PayrollStatus::parse("unpaid"), Some(PayrollStatus::Unpaid));
        assert_eq!(PayrollStatus::parse("PAID"), Some(PayrollStatus::Paid));
        assert_eq!(PayrollStatus::parse("void"), None);
    }

    #[test]
    fn test_normalize_month() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        assert_eq!(
            PayrollService::normalize_month(date),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_normalize_month_is_idempotent() {
        let first = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
        assert_eq!(PayrollService::normalize_month(first), first);
    }

    #[test]
    fn test_unpaid_entry_is_payable() {
        assert!(PayrollService::ensure_payable(PayrollStatus::Unpaid).is_ok());
    }

    #[test]
    fn test_paid_entry_cannot_be_paid_again() {
        assert_eq!(
            PayrollService::ensure_payable(PayrollStatus::Paid),
            Err(PayrollError::AlreadyPaid)
        );
    }

    #[test]
    fn test_validate_amount() {
        assert!(PayrollService::validate_amount(dec!(5_000_000)).is_ok());
        assert_eq!(
            PayrollService::validate_amount(dec!(0)),
            Err(PayrollError::NonPositiveAmount(dec!(0)))
        );
    }
}
