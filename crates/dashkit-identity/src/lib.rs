#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod profile;
mod service;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use profile::{EmailAddress, UserProfile, UserProfileBuilder, UserProfileBuilderError};
pub use service::IdentityService;

/// Tracing target for identity provider operations.
pub const TRACING_TARGET: &str = "dashkit_identity";

/// Source of user profiles for authenticated subjects.
///
/// Implement this trait to plug in an identity provider.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetches the profile of the given user.
    ///
    /// Returns `Ok(None)` when the provider does not know the user.
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;
}
