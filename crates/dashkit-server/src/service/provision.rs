//! Read-through account provisioning.
//!
//! An authenticated caller always ends up with exactly one account: the
//! stored one when it exists, otherwise a new one built from the caller's
//! identity-provider profile.

use dashkit_identity::IdentityService;
use dashkit_postgres::PgError;
use dashkit_postgres::model::{Account, NewAccount};
use dashkit_postgres::query::{AccountRepository, AccountStore};

use crate::TRACING_TARGET_PROVISION as TRACING_TARGET;
use crate::service::UsernameGenerator;

/// Why an account could not be returned.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The caller has no usable identity.
    #[error("caller is not authenticated")]
    NotAuthenticated,
    /// The identity provider failed or does not know the caller.
    #[error("profile is unavailable")]
    ProfileUnavailable(#[source] Option<dashkit_identity::Error>),
    /// The profile has no registered email address.
    #[error("profile has no email address")]
    MissingEmailAddress,
    /// The account store failed.
    #[error("account store failure: {0}")]
    Store(#[from] PgError),
}

/// Looks up or creates the account of an authenticated caller.
#[derive(Debug, Clone)]
pub struct AccountProvisioner {
    identity: IdentityService,
    usernames: UsernameGenerator,
}

impl AccountProvisioner {
    /// Creates a provisioner backed by the given identity provider.
    pub fn new(identity: IdentityService, usernames: UsernameGenerator) -> Self {
        Self {
            identity,
            usernames,
        }
    }

    /// Returns the account owned by `user_id`, creating it on first use.
    ///
    /// Existing accounts are returned unchanged without contacting the
    /// identity provider. Concurrent first calls for the same user converge
    /// on a single stored row. No store checkout is held while the profile
    /// is fetched.
    #[tracing::instrument(skip(self, store), target = TRACING_TARGET)]
    pub async fn provision<S>(&self, store: &S, user_id: &str) -> Result<Account, ProvisionError>
    where
        S: AccountStore,
    {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            tracing::error!(target: TRACING_TARGET, "Refusing to provision without a subject");
            return Err(ProvisionError::NotAuthenticated);
        }

        let existing = store
            .checkout()
            .await?
            .find_account_by_user_id(user_id)
            .await
            .inspect_err(|error| {
                tracing::error!(target: TRACING_TARGET, error = %error, "Failed to look up account");
            })?;

        if let Some(account) = existing {
            tracing::debug!(
                target: TRACING_TARGET,
                account_id = %account.id,
                username = %account.username,
                "Account found"
            );
            return Ok(account);
        }

        let new_account = self.new_account(user_id).await?;
        let account = store
            .checkout()
            .await?
            .create_account_if_absent(new_account)
            .await
            .inspect_err(|error| {
                tracing::error!(target: TRACING_TARGET, error = %error, "Failed to create account");
            })?;

        tracing::info!(
            target: TRACING_TARGET,
            account_id = %account.id,
            username = %account.username,
            email_address = %account.email_address,
            "Account provisioned"
        );

        Ok(account)
    }

    /// Builds the account payload from the caller's profile.
    async fn new_account(&self, user_id: &str) -> Result<NewAccount, ProvisionError> {
        let profile = match self.identity.fetch_profile(user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::error!(target: TRACING_TARGET, "Identity provider has no profile for the caller");
                return Err(ProvisionError::ProfileUnavailable(None));
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    retryable = error.is_retryable(),
                    "Failed to fetch profile"
                );
                return Err(ProvisionError::ProfileUnavailable(Some(error)));
            }
        };

        let Some(email_address) = profile.first_email_address() else {
            tracing::error!(target: TRACING_TARGET, "Profile has no email address");
            return Err(ProvisionError::MissingEmailAddress);
        };

        let username = self.usernames.generate(email_address);
        Ok(NewAccount::new(user_id, email_address, username))
    }
}

#[cfg(test)]
mod tests {
    use dashkit_identity::ErrorKind as IdentityErrorKind;
    use dashkit_test::fixtures::{profile_with_email, profile_without_email};
    use dashkit_test::{FailMode, MockAccountStore, MockIdentityProvider};

    use super::*;

    fn provisioner(identity: &MockIdentityProvider) -> AccountProvisioner {
        AccountProvisioner::new(identity.service(), UsernameGenerator::default())
    }

    #[tokio::test]
    async fn existing_account_is_returned_unchanged() -> anyhow::Result<()> {
        let store = MockAccountStore::new();
        let seeded = store.seed(NewAccount::new("u1", "a@x.com", "a123"));
        let identity = MockIdentityProvider::new();

        let account = provisioner(&identity).provision(&store, "u1").await?;

        assert_eq!(account, seeded);
        assert_eq!(identity.calls(), 0);
        assert_eq!(store.insert_calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_account_is_created_from_profile() -> anyhow::Result<()> {
        let store = MockAccountStore::new();
        let identity = MockIdentityProvider::new().with_profile(profile_with_email("u2", "b@y.com"));

        let account = provisioner(&identity).provision(&store, "u2").await?;

        assert_eq!(account.user_id, "u2");
        assert_eq!(account.email_address, "b@y.com");
        assert_eq!(account.username, "b305");
        assert_eq!(identity.requested(), vec!["u2".to_owned()]);
        assert_eq!(store.insert_calls(), 1);
        assert_eq!(store.accounts(), vec![account]);
        Ok(())
    }

    #[tokio::test]
    async fn second_call_reuses_the_created_account() -> anyhow::Result<()> {
        let store = MockAccountStore::new();
        let identity = MockIdentityProvider::new().with_profile(profile_with_email("u2", "b@y.com"));
        let provisioner = provisioner(&identity);

        let first = provisioner.provision(&store, "u2").await?;
        let second = provisioner.provision(&store, "u2").await?;

        assert_eq!(first, second);
        assert_eq!(identity.calls(), 1);
        assert_eq!(store.accounts().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn empty_subject_is_rejected_before_store_access() {
        let store = MockAccountStore::new();
        let identity = MockIdentityProvider::new();

        let error = provisioner(&identity)
            .provision(&store, "  ")
            .await
            .unwrap_err();

        assert!(matches!(error, ProvisionError::NotAuthenticated));
        assert_eq!(store.find_calls(), 0);
        assert_eq!(identity.calls(), 0);
    }

    #[tokio::test]
    async fn profile_without_email_is_not_provisioned() {
        let store = MockAccountStore::new();
        let identity = MockIdentityProvider::new().with_profile(profile_without_email("u3"));

        let error = provisioner(&identity)
            .provision(&store, "u3")
            .await
            .unwrap_err();

        assert!(matches!(error, ProvisionError::MissingEmailAddress));
        assert_eq!(store.insert_calls(), 0);
        assert!(store.accounts().is_empty());
    }

    #[tokio::test]
    async fn unknown_profile_is_unavailable() {
        let store = MockAccountStore::new();
        let identity = MockIdentityProvider::new();

        let error = provisioner(&identity)
            .provision(&store, "u4")
            .await
            .unwrap_err();

        assert!(matches!(error, ProvisionError::ProfileUnavailable(None)));
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn identity_faults_are_propagated() {
        let store = MockAccountStore::new();
        let identity = MockIdentityProvider::new().with_profile(profile_with_email("u2", "b@y.com"));
        identity.fail_with(IdentityErrorKind::ServiceUnavailable);

        let error = provisioner(&identity)
            .provision(&store, "u2")
            .await
            .unwrap_err();

        match error {
            ProvisionError::ProfileUnavailable(Some(source)) => {
                assert_eq!(source.kind, IdentityErrorKind::ServiceUnavailable);
            }
            other => panic!("expected an identity failure, got {other:?}"),
        }
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn store_read_faults_are_propagated() {
        let store = MockAccountStore::new();
        store.fail(FailMode::Reads);
        let identity = MockIdentityProvider::new().with_profile(profile_with_email("u2", "b@y.com"));

        let error = provisioner(&identity)
            .provision(&store, "u2")
            .await
            .unwrap_err();

        assert!(matches!(error, ProvisionError::Store(_)));
        assert_eq!(identity.calls(), 0);
    }

    #[tokio::test]
    async fn store_write_faults_are_propagated() {
        let store = MockAccountStore::new();
        store.fail(FailMode::Writes);
        let identity = MockIdentityProvider::new().with_profile(profile_with_email("u2", "b@y.com"));

        let error = provisioner(&identity)
            .provision(&store, "u2")
            .await
            .unwrap_err();

        assert!(matches!(error, ProvisionError::Store(PgError::Unexpected(_))));
        assert!(store.accounts().is_empty());
    }

    #[tokio::test]
    async fn concurrent_first_requests_converge() -> anyhow::Result<()> {
        let store = MockAccountStore::new();
        let identity = MockIdentityProvider::new().with_profile(profile_with_email("u5", "e@z.com"));
        let provisioner = provisioner(&identity);

        // Both requests miss the lookup, as if they had raced past it.
        store.stale_reads();
        let (first, second) = tokio::join!(
            provisioner.provision(&store, "u5"),
            provisioner.provision(&store, "u5"),
        );

        let (first, second) = (first?, second?);
        assert_eq!(first, second);
        assert_eq!(store.insert_calls(), 2);
        assert_eq!(store.accounts().len(), 1);
        assert_eq!(identity.calls(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn profile_is_fetched_without_a_store_checkout() -> anyhow::Result<()> {
        let store = MockAccountStore::new();
        let identity = MockIdentityProvider::new()
            .with_profile(profile_with_email("u6", "f@z.com"))
            .watch_store(&store);

        provisioner(&identity).provision(&store, "u6").await?;

        assert_eq!(identity.checkouts_during_fetch(), vec![0]);
        assert_eq!(store.open_checkouts(), 0);
        assert_eq!(store.find_calls(), 1);
        assert_eq!(store.insert_calls(), 1);
        Ok(())
    }
}
