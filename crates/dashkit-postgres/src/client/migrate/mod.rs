//! Embedded schema migrations.
//!
//! Migrations are compiled into the binary via [`MIGRATIONS`] and applied on
//! startup. Status queries compare the embedded set against the
//! `__diesel_schema_migrations` bookkeeping table.
//!
//! [`MIGRATIONS`]: crate::MIGRATIONS

mod client_ext;
pub(crate) mod custom_hooks;
mod migrate_result;
mod run_migration;
mod run_utility;

pub use client_ext::PgClientExt;
pub use migrate_result::{MigrationResult, MigrationStatus};
pub use run_migration::run_pending_migrations;
pub use run_utility::{
    embedded_migration_versions, get_applied_migrations, get_migration_status,
    verify_schema_integrity,
};
