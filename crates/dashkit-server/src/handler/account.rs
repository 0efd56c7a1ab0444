//! Account page handler.
//!
//! Returns the caller's account, provisioning it from the identity-provider
//! profile on first use.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use dashkit_postgres::PgClient;
use dashkit_postgres::query::AccountStore;

use crate::extract::AuthSubject;
use crate::handler::Result;
use crate::handler::response::AccountPage;
use crate::service::{AccountProvisioner, ServiceState};

/// Tracing target for account operations.
const TRACING_TARGET: &str = "dashkit_server::handler::accounts";

/// Builds the account page for `user_id`.
async fn account_page<S>(
    provisioner: &AccountProvisioner,
    store: &S,
    user_id: &str,
) -> Result<AccountPage>
where
    S: AccountStore,
{
    let account = provisioner.provision(store, user_id).await.inspect_err(|error| {
        tracing::error!(target: TRACING_TARGET, error = %error, "Failed to provision account");
    })?;

    let page = AccountPage::new(account);
    tracing::debug!(
        target: TRACING_TARGET,
        account_id = %page.account.account_id,
        username = %page.account.username,
        subscription = ?page.subscription,
        "Account page prepared"
    );

    Ok(page)
}

/// Returns the caller's account, creating it if it does not exist yet.
#[tracing::instrument(skip_all, fields(user_id = %auth_subject.user_id()))]
async fn read_account(
    auth_subject: AuthSubject,
    State(pg_client): State<PgClient>,
    State(provisioner): State<AccountProvisioner>,
) -> Result<(StatusCode, Json<AccountPage>)> {
    let page = account_page(&provisioner, &pg_client, auth_subject.user_id()).await?;
    Ok((StatusCode::OK, Json(page)))
}

/// Returns a [`Router`] with all account routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/account", get(read_account))
}
