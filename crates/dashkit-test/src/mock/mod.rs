//! In-memory stand-ins for the account store and the identity provider.

mod account_store;
mod identity;

pub use account_store::{FailMode, MockAccountStore, MockCheckout};
pub use identity::MockIdentityProvider;
