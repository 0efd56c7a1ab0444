//! Scripted identity provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashkit_identity::{Error, ErrorKind, IdentityProvider, IdentityService, Result, UserProfile};

use super::MockAccountStore;

#[derive(Default)]
struct ProviderState {
    profiles: HashMap<String, UserProfile>,
    failure: Option<ErrorKind>,
    requested: Vec<String>,
    watched: Option<MockAccountStore>,
    checkouts_during_fetch: Vec<usize>,
}

/// Identity provider answering from a fixed set of profiles.
///
/// Unknown users resolve to `Ok(None)`. Clones share state.
#[derive(Clone, Default)]
pub struct MockIdentityProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a profile, keyed by its id.
    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.lock().profiles.insert(profile.id.clone(), profile);
        self
    }

    /// Makes every subsequent lookup fail with an error of the given kind.
    pub fn fail_with(&self, kind: ErrorKind) {
        self.lock().failure = Some(kind);
    }

    /// Records the open checkouts of `store` on every lookup.
    pub fn watch_store(self, store: &MockAccountStore) -> Self {
        self.lock().watched = Some(store.clone());
        self
    }

    /// Open checkouts of the watched store seen by each lookup.
    pub fn checkouts_during_fetch(&self) -> Vec<usize> {
        self.lock().checkouts_during_fetch.clone()
    }

    /// User ids looked up so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.lock().requested.clone()
    }

    /// Number of lookups performed.
    pub fn calls(&self) -> usize {
        self.lock().requested.len()
    }

    /// Wraps a clone of this provider in an [`IdentityService`].
    pub fn service(&self) -> IdentityService {
        IdentityService::new(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, ProviderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let mut state = self.lock();
        state.requested.push(user_id.to_owned());
        if let Some(open) = state.watched.as_ref().map(MockAccountStore::open_checkouts) {
            state.checkouts_during_fetch.push(open);
        }

        if let Some(kind) = state.failure {
            return Err(Error::new(kind).with_message("mock identity provider failure"));
        }

        Ok(state.profiles.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn answers_from_registered_profiles() {
        let provider = MockIdentityProvider::new()
            .with_profile(fixtures::profile_with_email("u2", "b@y.com"));
        let service = provider.service();

        let profile = service.fetch_profile("u2").await.expect("lookup succeeds");
        assert_eq!(
            profile.as_ref().and_then(UserProfile::first_email_address),
            Some("b@y.com")
        );
        assert_eq!(service.fetch_profile("u9").await.ok().flatten(), None);
        assert_eq!(provider.requested(), vec!["u2".to_owned(), "u9".to_owned()]);
    }

    #[tokio::test]
    async fn scripted_failure() {
        let provider = MockIdentityProvider::new();
        provider.fail_with(ErrorKind::Timeout);

        let error = provider.fetch_profile("u1").await.unwrap_err();
        assert!(error.is_retryable());
        assert_eq!(provider.calls(), 1);
    }
}
