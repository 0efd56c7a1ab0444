//! Database row models.
//!
//! Each model pairs a queryable row type with an insertable counterpart.

mod account;

pub use account::{Account, NewAccount};
