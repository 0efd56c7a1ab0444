//! Named database constraints, grouped by table.

mod accounts;

use std::fmt;

pub use accounts::AccountConstraints;
use serde::{Deserialize, Serialize};

/// Any known constraint violation, tagged with its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    Account(AccountConstraints),
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Chronological integrity constraints (timestamp relationships).
    Chronological,
    /// Business logic constraints (domain-specific rules).
    BusinessLogic,
    /// Uniqueness constraints (primary keys, unique indexes).
    Uniqueness,
}

impl ConstraintViolation {
    /// Resolves a constraint name into a known violation.
    ///
    /// ```
    /// use dashkit_postgres::types::ConstraintViolation;
    ///
    /// assert!(ConstraintViolation::new("accounts_user_id_unique_idx").is_some());
    /// assert!(ConstraintViolation::new("unknown_constraint").is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        if constraint.starts_with("accounts_") {
            return AccountConstraints::new(constraint).map(ConstraintViolation::Account);
        }

        None
    }

    /// Returns the table the constraint is defined on.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::Account(_) => "accounts",
        }
    }

    /// Returns the category of this constraint violation.
    pub fn constraint_category(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::Account(c) => c.categorize(),
        }
    }

    /// Returns the constraint name as reported by PostgreSQL.
    pub fn constraint_name(&self) -> String {
        match self {
            ConstraintViolation::Account(c) => c.to_string(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.constraint_name())
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ConstraintViolation::new(&value).ok_or_else(|| format!("unknown constraint: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_account_constraints() {
        let violation = ConstraintViolation::new("accounts_username_not_empty")
            .expect("known constraint");
        assert_eq!(violation.table_name(), "accounts");
        assert_eq!(violation.constraint_category(), ConstraintCategory::Validation);
        assert_eq!(violation.to_string(), "accounts_username_not_empty");
    }

    #[test]
    fn unknown_prefix_is_ignored() {
        assert_eq!(ConstraintViolation::new("sessions_token_unique_idx"), None);
        assert_eq!(ConstraintViolation::new("accounts_nonexistent"), None);
    }
}
