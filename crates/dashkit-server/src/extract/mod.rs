//! Request extractors.
//!
//! - [`AuthSubject`] verifies the bearer token issued by the identity
//!   provider and yields the caller's user id.

mod auth_subject;

pub use crate::extract::auth_subject::{AuthClaims, AuthSubject};
