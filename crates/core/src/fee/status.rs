//! Fee record status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment status of a student fee record.
///
/// The valid transitions are:
/// - Unpaid → Partial (first payment below the structure amount)
/// - Unpaid → Paid (single covering payment)
/// - Partial → Paid (cumulative payments reach the structure amount)
///
/// No backward transition exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    /// No payment has been recorded.
    Unpaid,
    /// Payments recorded, cumulative total below the structure amount.
    Partial,
    /// Cumulative payments meet or exceed the structure amount.
    Paid,
}

impl FeeStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unpaid" => Some(Self::Unpaid),
            "partial" => Some(Self::Partial),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }

    /// Returns true once the obligation is fully settled.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Rank used to state the monotonicity property: a recomputed
    /// status never has a lower rank than the stored one.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Unpaid => 0,
            Self::Partial => 1,
            Self::Paid => 2,
        }
    }
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(FeeStatus::Unpaid.as_str(), "unpaid");
        assert_eq!(FeeStatus::Partial.as_str(), "partial");
        assert_eq!(FeeStatus::Paid.as_str(), "paid");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(FeeStatus::parse("unpaid"), Some(FeeStatus::Unpaid));
        assert_eq!(FeeStatus::parse("PARTIAL"), Some(FeeStatus::Partial));
        assert_eq!(FeeStatus::parse("Paid"), Some(FeeStatus::Paid));
        assert_eq!(FeeStatus::parse("refunded"), None);
    }

    #[test]
    fn test_status_rank_is_ordered() {
        assert!(FeeStatus::Unpaid.rank() < FeeStatus::Partial.rank());
        assert!(FeeStatus::Partial.rank() < FeeStatus::Paid.rank());
    }

    #[test]
    fn test_only_paid_is_settled() {
        assert!(!FeeStatus::Unpaid.is_settled());
        assert!(!FeeStatus::Partial.is_settled());
        assert!(FeeStatus::Paid.is_settled());
    }
}
