//! Prelude module for dashkit-postgres.
//!
//! Re-exports the most commonly used types and traits so that a single
//! `use dashkit_postgres::prelude::*;` is enough for repository code.

pub use diesel::prelude::*;
pub use diesel_async::RunQueryDsl;

pub use crate::PgConnection;
pub use crate::client::{
    ConnectionPool, MigrationResult, MigrationStatus, PgClient, PgClientExt, PgConfig, PgConn,
    PgPoolStatus,
};
pub use crate::model::{Account, NewAccount};
pub use crate::query::{AccountRepository, AccountStore};
pub use crate::{PgError, PgResult};
