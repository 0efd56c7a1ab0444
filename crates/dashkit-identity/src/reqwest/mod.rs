//! Reqwest-based client for the identity provider's backend API.
//!
//! # Example
//!
//! ```rust,ignore
//! use dashkit_identity::IdentityService;
//! use dashkit_identity::reqwest::{IdentityClient, IdentityConfig};
//!
//! let config = IdentityConfig::new("https://api.identity.example/v1", "sk_test_123");
//! let service: IdentityService = IdentityClient::new(config)?.into_service();
//! ```

mod client;
mod config;
mod error;

pub use client::IdentityClient;
pub use config::{DEFAULT_TIMEOUT_SECS, IdentityConfig};
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "dashkit_identity::reqwest";
