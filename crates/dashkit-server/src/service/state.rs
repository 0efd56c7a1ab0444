//! Application state and dependency injection.

use dashkit_postgres::PgClient;

use crate::service::{AccountProvisioner, AuthKeys, Result, ServiceConfig};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pg_client: PgClient,
    auth_keys: AuthKeys,
    account_provisioner: AccountProvisioner,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to the database, applies migrations and loads the token
    /// verification key.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let identity = config.connect_identity()?;
        let service_state = Self {
            pg_client: config.connect_postgres().await?,
            auth_keys: config.load_auth_keys().await?,
            account_provisioner: config.account_provisioner(identity),
        };

        Ok(service_state)
    }

    /// Assembles state from already constructed parts.
    pub fn new(
        pg_client: PgClient,
        auth_keys: AuthKeys,
        account_provisioner: AccountProvisioner,
    ) -> Self {
        Self {
            pg_client,
            auth_keys,
            account_provisioner,
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);
impl_di!(auth_keys: AuthKeys);
impl_di!(account_provisioner: AccountProvisioner);
