//! Repository traits implemented for [`PgConnection`] and [`PgConn`], and
//! the [`AccountStore`] checkout seam implemented for [`PgClient`].
//!
//! [`PgConnection`]: crate::PgConnection
//! [`PgConn`]: crate::PgConn
//! [`PgClient`]: crate::PgClient

pub mod account;

pub use account::{AccountRepository, AccountStore};
