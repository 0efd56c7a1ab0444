//! Cloneable handle over an [`IdentityProvider`].

use std::fmt;
use std::sync::Arc;

use crate::{IdentityProvider, Result, TRACING_TARGET, UserProfile};

/// Shared identity provider handle used for dependency injection.
#[derive(Clone)]
pub struct IdentityService {
    inner: Arc<dyn IdentityProvider>,
}

impl IdentityService {
    /// Wraps a provider implementation.
    pub fn new<P>(provider: P) -> Self
    where
        P: IdentityProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Fetches the profile of the given user.
    #[tracing::instrument(skip(self), target = TRACING_TARGET)]
    pub async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let result = self.inner.fetch_profile(user_id).await;

        match &result {
            Ok(Some(profile)) => tracing::debug!(
                target: TRACING_TARGET,
                email_addresses = profile.email_addresses.len(),
                "Profile fetched"
            ),
            Ok(None) => tracing::warn!(target: TRACING_TARGET, "Identity provider has no profile for user"),
            Err(error) => tracing::error!(
                target: TRACING_TARGET,
                error = %error,
                retryable = error.is_retryable(),
                "Failed to fetch profile"
            ),
        }

        result
    }
}

impl fmt::Debug for IdentityService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityService").finish_non_exhaustive()
    }
}
