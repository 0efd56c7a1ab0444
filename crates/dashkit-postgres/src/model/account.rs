//! Provisioned account rows.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::accounts;

/// Account provisioned for an externally authenticated user.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Identifier issued by the identity provider, unique per account.
    pub user_id: String,
    /// Email address copied from the identity provider at provisioning time.
    pub email_address: String,
    /// Display handle derived from the email address.
    pub username: String,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
}

impl Account {
    /// Returns the creation time as a [`jiff::Timestamp`].
    #[inline]
    pub fn created(&self) -> jiff::Timestamp {
        self.created_at.into()
    }

    /// Returns the last update time as a [`jiff::Timestamp`].
    #[inline]
    pub fn updated(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}

/// Data for provisioning a new account.
#[derive(Debug, Default, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccount {
    /// Identifier issued by the identity provider.
    pub user_id: String,
    /// Email address to store with the account.
    pub email_address: String,
    /// Display handle for the account.
    pub username: String,
}

impl NewAccount {
    /// Creates a new account payload.
    pub fn new(
        user_id: impl Into<String>,
        email_address: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email_address: email_address.into(),
            username: username.into(),
        }
    }

    /// Trims surrounding whitespace from every field.
    pub fn normalized(self) -> Self {
        Self {
            user_id: self.user_id.trim().to_owned(),
            email_address: self.email_address.trim().to_owned(),
            username: self.username.trim().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_trims_but_keeps_case() {
        let account = NewAccount::new(" user_2abc ", " Ann.Lee@Example.com\n", "AnnLee 042").normalized();
        assert_eq!(account.user_id, "user_2abc");
        assert_eq!(account.email_address, "Ann.Lee@Example.com");
        assert_eq!(account.username, "AnnLee 042");
    }
}
