//! Application state and dependency injection.

mod auth_keys;
mod config;
mod provision;
mod state;
mod username;

pub use crate::service::auth_keys::{AuthAlgorithm, AuthKeys, AuthKeysConfig};
pub use crate::service::config::ServiceConfig;
pub use crate::service::provision::{AccountProvisioner, ProvisionError};
pub use crate::service::state::ServiceState;
pub use crate::service::username::{DEFAULT_SUFFIX_DIGITS, MAX_SUFFIX_DIGITS, UsernameGenerator};
pub use crate::{Error, Result};
