use diesel::migration::{Migration, MigrationName, MigrationSource};
use diesel::pg::Pg;
use diesel::sql_query;
use diesel::sql_types::{Bool, Text};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use super::MigrationStatus;
use crate::{MIGRATIONS, PgError, PgResult, TRACING_TARGET_MIGRATION};

const MIGRATION_TABLE: &str = "__diesel_schema_migrations";

#[derive(diesel::QueryableByName)]
struct TableExists {
    #[diesel(sql_type = Bool)]
    exists: bool,
}

#[derive(diesel::QueryableByName)]
struct AppliedVersion {
    #[diesel(sql_type = Text)]
    version: String,
}

/// Returns the versions of all migrations embedded in this crate, sorted.
pub fn embedded_migration_versions() -> PgResult<Vec<String>> {
    let migrations = MigrationSource::<Pg>::migrations(&MIGRATIONS).map_err(PgError::Migration)?;
    let mut versions: Vec<String> = migrations
        .iter()
        .map(|migration| migration.name().version().to_string())
        .collect();
    versions.sort();
    Ok(versions)
}

/// Compares the embedded migrations with the ones recorded in the database.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATION)]
pub async fn get_migration_status(conn: &mut AsyncPgConnection) -> PgResult<MigrationStatus> {
    let applied_versions = get_applied_migrations(conn).await?;
    let pending_versions: Vec<String> = embedded_migration_versions()?
        .into_iter()
        .filter(|version| !applied_versions.contains(version))
        .collect();

    let status = MigrationStatus::new(applied_versions, pending_versions);
    tracing::debug!(
        target: TRACING_TARGET_MIGRATION,
        applied = status.applied_migrations(),
        pending = status.pending_migrations(),
        "Migration status retrieved"
    );

    Ok(status)
}

/// Fails if the migration bookkeeping table is missing.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATION)]
pub async fn verify_schema_integrity(conn: &mut AsyncPgConnection) -> PgResult<()> {
    if !migration_table_exists(conn).await? {
        tracing::warn!(target: TRACING_TARGET_MIGRATION, "Migration table does not exist");
        return Err(PgError::Migration(
            format!("migration table {MIGRATION_TABLE} does not exist").into(),
        ));
    }

    tracing::debug!(target: TRACING_TARGET_MIGRATION, "Schema integrity verified");
    Ok(())
}

/// Lists applied migration versions, oldest first.
///
/// A database that has never been migrated has no bookkeeping table yet and
/// yields an empty list.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATION)]
pub async fn get_applied_migrations(conn: &mut AsyncPgConnection) -> PgResult<Vec<String>> {
    if !migration_table_exists(conn).await? {
        return Ok(Vec::new());
    }

    let rows = sql_query(format!("SELECT version FROM {MIGRATION_TABLE} ORDER BY version"))
        .get_results::<AppliedVersion>(conn)
        .await
        .map_err(|e| PgError::Migration(format!("failed to read applied migrations: {e}").into()))?;

    Ok(rows.into_iter().map(|row| row.version).collect())
}

async fn migration_table_exists(conn: &mut AsyncPgConnection) -> PgResult<bool> {
    let result = sql_query(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_name = $1
         ) AS exists",
    )
    .bind::<Text, _>(MIGRATION_TABLE)
    .get_result::<TableExists>(conn)
    .await
    .map_err(|e| PgError::Migration(format!("failed to check migration table: {e}").into()))?;

    Ok(result.exists)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_versions_include_accounts_migration() {
        let versions = embedded_migration_versions().expect("embedded migrations are readable");
        assert!(!versions.is_empty());
        assert!(versions.iter().any(|v| v.starts_with("20250601")));
        assert!(versions.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
