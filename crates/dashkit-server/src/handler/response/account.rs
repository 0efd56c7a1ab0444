//! Account response types.

use dashkit_postgres::model;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an account.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier of the account.
    pub account_id: Uuid,
    /// Identity-provider user id owning the account.
    pub user_id: String,
    /// Email address copied from the profile at provisioning time.
    pub email_address: String,
    /// Display handle derived from the email address.
    pub username: String,

    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
}

impl Account {
    pub fn from_model(account: model::Account) -> Self {
        Self {
            account_id: account.id,
            created_at: account.created(),
            updated_at: account.updated(),

            user_id: account.user_id,
            email_address: account.email_address,
            username: account.username,
        }
    }
}

/// Billing subscription attached to an account.
///
/// Subscriptions are not stored by this service yet, so pages always carry
/// `null` in its place.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: String,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub stripe_current_period_end: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Everything the dashboard needs to render the account page.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPage {
    pub account: Account,
    pub subscription: Option<Subscription>,
}

impl AccountPage {
    /// Creates a page for an account without subscription data.
    pub fn new(account: model::Account) -> Self {
        Self {
            account: Account::from_model(account),
            subscription: None,
        }
    }
}
