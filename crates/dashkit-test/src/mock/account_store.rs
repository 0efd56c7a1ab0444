//! In-memory account repository.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashkit_postgres::model::{Account, NewAccount};
use dashkit_postgres::query::{AccountRepository, AccountStore};
use dashkit_postgres::{PgError, PgResult};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use jiff_diesel::Timestamp;
use uuid::Uuid;

/// Which repository calls should fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailMode {
    #[default]
    None,
    /// Lookups fail with an unexpected store error.
    Reads,
    /// Inserts fail with an unexpected store error.
    Writes,
    /// Inserts fail with the given constraint violation.
    Constraint(&'static str),
}

#[derive(Default)]
struct StoreState {
    accounts: Vec<Account>,
    fail_mode: FailMode,
    stale_reads: bool,
}

/// Account repository backed by a vector.
///
/// Clones share state, so a test can hand one clone to the code under test
/// and inspect another afterwards.
#[derive(Clone, Default)]
pub struct MockAccountStore {
    state: Arc<Mutex<StoreState>>,
    finds: Arc<AtomicUsize>,
    inserts: Arc<AtomicUsize>,
    checkouts: Arc<AtomicUsize>,
}

impl MockAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an account directly, bypassing call counters.
    pub fn seed(&self, new_account: NewAccount) -> Account {
        let account = materialize(new_account);
        self.lock().accounts.push(account.clone());
        account
    }

    /// Makes subsequent calls fail according to `mode`.
    pub fn fail(&self, mode: FailMode) {
        self.lock().fail_mode = mode;
    }

    /// Makes lookups miss even when the account exists.
    ///
    /// Simulates a request that checked for the account just before a
    /// concurrent request inserted it.
    pub fn stale_reads(&self) {
        self.lock().stale_reads = true;
    }

    /// Returns a snapshot of all stored accounts.
    pub fn accounts(&self) -> Vec<Account> {
        self.lock().accounts.clone()
    }

    /// Number of lookups performed.
    pub fn find_calls(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    /// Number of insert attempts performed.
    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Number of checkouts not yet dropped.
    pub fn open_checkouts(&self) -> usize {
        self.checkouts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writes(&self) -> PgResult<()> {
        match self.lock().fail_mode {
            FailMode::Writes => Err(PgError::Unexpected("mock store rejected the write".into())),
            FailMode::Constraint(constraint) => Err(constraint_error(constraint)),
            FailMode::None | FailMode::Reads => Ok(()),
        }
    }
}

impl AccountRepository for MockAccountStore {
    async fn find_account_by_user_id(&mut self, user_id: &str) -> PgResult<Option<Account>> {
        self.finds.fetch_add(1, Ordering::SeqCst);

        let state = self.lock();
        if state.fail_mode == FailMode::Reads {
            return Err(PgError::Unexpected("mock store rejected the read".into()));
        }
        if state.stale_reads {
            return Ok(None);
        }

        Ok(state
            .accounts
            .iter()
            .find(|account| account.user_id == user_id.trim())
            .cloned())
    }

    async fn create_account(&mut self, new_account: NewAccount) -> PgResult<Account> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.check_writes()?;

        let new_account = new_account.normalized();
        let mut state = self.lock();
        if state.accounts.iter().any(|a| a.user_id == new_account.user_id) {
            return Err(constraint_error("accounts_user_id_unique_idx"));
        }

        let account = materialize(new_account);
        state.accounts.push(account.clone());
        Ok(account)
    }

    async fn create_account_if_absent(&mut self, new_account: NewAccount) -> PgResult<Account> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.check_writes()?;

        let new_account = new_account.normalized();
        let mut state = self.lock();
        if let Some(existing) = state
            .accounts
            .iter()
            .find(|a| a.user_id == new_account.user_id)
        {
            return Ok(existing.clone());
        }

        let account = materialize(new_account);
        state.accounts.push(account.clone());
        Ok(account)
    }
}

/// Repository checked out of a [`MockAccountStore`].
///
/// Counts as open until dropped.
pub struct MockCheckout {
    store: MockAccountStore,
}

impl Drop for MockCheckout {
    fn drop(&mut self) {
        self.store.checkouts.fetch_sub(1, Ordering::SeqCst);
    }
}

impl AccountStore for MockAccountStore {
    type Repository = MockCheckout;

    async fn checkout(&self) -> PgResult<MockCheckout> {
        self.checkouts.fetch_add(1, Ordering::SeqCst);
        Ok(MockCheckout {
            store: self.clone(),
        })
    }
}

impl AccountRepository for MockCheckout {
    async fn find_account_by_user_id(&mut self, user_id: &str) -> PgResult<Option<Account>> {
        self.store.find_account_by_user_id(user_id).await
    }

    async fn create_account(&mut self, new_account: NewAccount) -> PgResult<Account> {
        self.store.create_account(new_account).await
    }

    async fn create_account_if_absent(&mut self, new_account: NewAccount) -> PgResult<Account> {
        self.store.create_account_if_absent(new_account).await
    }
}

fn materialize(new_account: NewAccount) -> Account {
    let now = jiff::Timestamp::now();
    Account {
        id: Uuid::new_v4(),
        user_id: new_account.user_id,
        email_address: new_account.email_address,
        username: new_account.username,
        created_at: Timestamp::from(now),
        updated_at: Timestamp::from(now),
    }
}

/// Database error details carrying a constraint name.
#[derive(Debug)]
struct ConstraintInfo {
    constraint: &'static str,
}

impl DatabaseErrorInformation for ConstraintInfo {
    fn message(&self) -> &str {
        "constraint violated"
    }

    fn details(&self) -> Option<&str> {
        None
    }

    fn hint(&self) -> Option<&str> {
        None
    }

    fn table_name(&self) -> Option<&str> {
        Some("accounts")
    }

    fn column_name(&self) -> Option<&str> {
        None
    }

    fn constraint_name(&self) -> Option<&str> {
        Some(self.constraint)
    }

    fn statement_position(&self) -> Option<i32> {
        None
    }
}

fn constraint_error(constraint: &'static str) -> PgError {
    let kind = if constraint.ends_with("_unique_idx") {
        DatabaseErrorKind::UniqueViolation
    } else {
        DatabaseErrorKind::CheckViolation
    };

    PgError::Query(DieselError::DatabaseError(
        kind,
        Box::new(ConstraintInfo { constraint }),
    ))
}

#[cfg(test)]
mod tests {
    use dashkit_postgres::types::{AccountConstraints, ConstraintViolation};

    use super::*;

    #[tokio::test]
    async fn insert_then_find() {
        let mut store = MockAccountStore::new();
        let created = store
            .create_account(NewAccount::new("u1", "a@x.com", "a123"))
            .await
            .expect("insert succeeds");

        let found = store.find_account_by_user_id("u1").await.expect("lookup succeeds");
        assert_eq!(found, Some(created));
        assert_eq!(store.find_calls(), 1);
        assert_eq!(store.insert_calls(), 1);
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_unique_violation() {
        let mut store = MockAccountStore::new();
        store.seed(NewAccount::new("u1", "a@x.com", "a123"));

        let error = store
            .create_account(NewAccount::new("u1", "other@x.com", "other"))
            .await
            .unwrap_err();
        assert_eq!(
            error.constraint_violation(),
            Some(ConstraintViolation::Account(AccountConstraints::UserIdUnique))
        );
    }

    #[tokio::test]
    async fn insert_if_absent_returns_existing_row() {
        let mut store = MockAccountStore::new();
        let seeded = store.seed(NewAccount::new("u1", "a@x.com", "a123"));

        let returned = store
            .create_account_if_absent(NewAccount::new("u1", "other@x.com", "other"))
            .await
            .expect("upsert succeeds");
        assert_eq!(returned, seeded);
        assert_eq!(store.accounts().len(), 1);
    }

    #[tokio::test]
    async fn checkouts_are_released_on_drop() {
        let store = MockAccountStore::new();
        store.seed(NewAccount::new("u1", "a@x.com", "a123"));

        let mut checkout = store.checkout().await.expect("checkout succeeds");
        assert_eq!(store.open_checkouts(), 1);
        let found = checkout
            .find_account_by_user_id("u1")
            .await
            .expect("lookup succeeds");
        assert!(found.is_some());

        drop(checkout);
        assert_eq!(store.open_checkouts(), 0);
        assert_eq!(store.find_calls(), 1);
    }

    #[tokio::test]
    async fn fail_modes() {
        let mut store = MockAccountStore::new();

        store.fail(FailMode::Reads);
        assert!(store.find_account_by_user_id("u1").await.is_err());

        store.fail(FailMode::Writes);
        assert!(store.find_account_by_user_id("u1").await.is_ok());
        assert!(
            store
                .create_account_if_absent(NewAccount::new("u1", "a@x.com", "a"))
                .await
                .is_err()
        );
        assert!(store.accounts().is_empty());
    }
}
