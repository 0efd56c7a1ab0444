//! User profile as returned by the identity provider.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// An email address registered with the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Provider-side identifier of the address.
    pub id: String,
    /// The address itself.
    pub email_address: String,
}

impl EmailAddress {
    pub fn new(id: impl Into<String>, email_address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email_address: email_address.into(),
        }
    }
}

/// Profile metadata for an authenticated user.
///
/// Addresses keep the order the provider returned them in; the first one is
/// the address the user registered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(
    name = "UserProfileBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_profile")
)]
pub struct UserProfile {
    /// Subject identifier of the user.
    pub id: String,
    /// Registered email addresses, in registration order.
    #[builder(setter(custom), default)]
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[builder(default)]
    #[serde(default)]
    pub primary_email_address_id: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub first_name: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UserProfile {
    /// Create a new profile builder.
    pub fn builder() -> UserProfileBuilder {
        UserProfileBuilder::default()
    }

    /// Returns the first registered email address, if any.
    pub fn first_email_address(&self) -> Option<&str> {
        self.email_addresses
            .first()
            .map(|email| email.email_address.as_str())
    }

    /// Returns the address marked as primary, if the provider marks one.
    pub fn primary_email_address(&self) -> Option<&str> {
        let primary_id = self.primary_email_address_id.as_deref()?;
        self.email_addresses
            .iter()
            .find(|email| email.id == primary_id)
            .map(|email| email.email_address.as_str())
    }

    /// Returns the first and last name joined by a space, if either is set.
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.to_owned()),
            (None, None) => None,
        }
    }
}

impl UserProfileBuilder {
    /// Appends a registered email address.
    pub fn with_email_address(
        mut self,
        id: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        self.email_addresses
            .get_or_insert_with(Vec::new)
            .push(EmailAddress::new(id, email_address));
        self
    }

    fn validate_profile(&self) -> Result<(), String> {
        if let Some(id) = &self.id
            && id.trim().is_empty()
        {
            return Err("Profile id cannot be empty".to_string());
        }

        Ok(())
    }
}
