//! Accounts table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Account table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AccountConstraints {
    #[strum(serialize = "accounts_user_id_not_empty")]
    UserIdNotEmpty,
    #[strum(serialize = "accounts_username_not_empty")]
    UsernameNotEmpty,

    #[strum(serialize = "accounts_updated_after_created")]
    UpdatedAfterCreated,

    #[strum(serialize = "accounts_user_id_unique_idx")]
    UserIdUnique,
}

impl AccountConstraints {
    /// Parses a constraint name reported by PostgreSQL.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            AccountConstraints::UserIdNotEmpty | AccountConstraints::UsernameNotEmpty => {
                ConstraintCategory::Validation
            }
            AccountConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
            AccountConstraints::UserIdUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<AccountConstraints> for String {
    #[inline]
    fn from(val: AccountConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for AccountConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_variant_parses_back_from_its_name() {
        for constraint in AccountConstraints::iter() {
            let name = constraint.to_string();
            assert!(name.starts_with("accounts_"));
            assert_eq!(AccountConstraints::new(&name), Some(constraint));
        }
    }

    #[test]
    fn unique_user_id_is_a_uniqueness_violation() {
        let constraint = AccountConstraints::new("accounts_user_id_unique_idx");
        assert_eq!(constraint, Some(AccountConstraints::UserIdUnique));
        assert_eq!(
            constraint.map(|c| c.categorize()),
            Some(ConstraintCategory::Uniqueness)
        );
    }

    #[test]
    fn serde_uses_constraint_names() {
        let json = serde_json::to_string(&AccountConstraints::UsernameNotEmpty)
            .expect("constraint serializes");
        assert_eq!(json, "\"accounts_username_not_empty\"");
        assert!(serde_json::from_str::<AccountConstraints>("\"accounts_bogus\"").is_err());
    }
}
