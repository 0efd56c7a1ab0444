#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::error::{BoxedError, Error, ErrorKind, Result};

/// Bearer token verification and subject extraction.
pub const TRACING_TARGET_AUTHENTICATION: &str = "dashkit_server::authentication";

/// Account lookup and provisioning.
pub const TRACING_TARGET_PROVISION: &str = "dashkit_server::provision";

/// Loading and validating service configuration and key material.
pub const TRACING_TARGET_SERVICE: &str = "dashkit_server::service";
