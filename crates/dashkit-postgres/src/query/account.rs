//! Account repository for provisioning and looking up accounts.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{Account, NewAccount};
use crate::{PgClient, PgConn, PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for account database operations.
pub trait AccountRepository {
    /// Finds the account owned by an identity-provider user.
    fn find_account_by_user_id(
        &mut self,
        user_id: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Inserts a new account.
    ///
    /// Fails with a unique violation on `accounts_user_id_unique_idx` when
    /// the user already owns an account.
    fn create_account(
        &mut self,
        new_account: NewAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Inserts a new account unless the user already owns one, and returns
    /// whichever row is stored.
    ///
    /// Concurrent callers for the same user all observe the same row.
    fn create_account_if_absent(
        &mut self,
        new_account: NewAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;
}

/// Source of short-lived [`AccountRepository`] checkouts.
///
/// A checkout is released when dropped, so callers can give it back while
/// they wait on slower collaborators.
pub trait AccountStore: Send + Sync {
    /// Repository handed out by [`checkout`](Self::checkout).
    type Repository: AccountRepository + Send;

    /// Checks out a repository.
    fn checkout(&self) -> impl Future<Output = PgResult<Self::Repository>> + Send;
}

impl AccountStore for PgClient {
    type Repository = PgConn;

    async fn checkout(&self) -> PgResult<PgConn> {
        self.get_connection().await
    }
}

impl AccountRepository for PgConn {
    async fn find_account_by_user_id(&mut self, user_id: &str) -> PgResult<Option<Account>> {
        self.as_pg_connection().find_account_by_user_id(user_id).await
    }

    async fn create_account(&mut self, new_account: NewAccount) -> PgResult<Account> {
        self.as_pg_connection().create_account(new_account).await
    }

    async fn create_account_if_absent(&mut self, new_account: NewAccount) -> PgResult<Account> {
        self.as_pg_connection()
            .create_account_if_absent(new_account)
            .await
    }
}

impl AccountRepository for PgConnection {
    async fn find_account_by_user_id(&mut self, user_id: &str) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::user_id.eq(user_id.trim()))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn create_account(&mut self, new_account: NewAccount) -> PgResult<Account> {
        use schema::accounts;

        diesel::insert_into(accounts::table)
            .values(&new_account.normalized())
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn create_account_if_absent(&mut self, new_account: NewAccount) -> PgResult<Account> {
        use schema::accounts::{self, dsl};

        let new_account = new_account.normalized();
        let inserted = diesel::insert_into(accounts::table)
            .values(&new_account)
            .on_conflict(dsl::user_id)
            .do_nothing()
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        if let Some(account) = inserted {
            return Ok(account);
        }

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            user_id = %new_account.user_id,
            "Account already provisioned by a concurrent request"
        );

        // The conflicting row is committed by the time ON CONFLICT reports it.
        accounts::table
            .filter(dsl::user_id.eq(&new_account.user_id))
            .select(Account::as_select())
            .first(self)
            .await
            .map_err(PgError::from)
    }
}
