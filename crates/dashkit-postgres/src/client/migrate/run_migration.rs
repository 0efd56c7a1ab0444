use std::time::Instant;

use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use super::{MigrationResult, custom_hooks, get_migration_status};
use crate::{MIGRATIONS, PgClient, PgError, PgResult, PooledConnection, TRACING_TARGET_MIGRATION};

/// Applies all pending embedded migrations.
///
/// The diesel migration harness is synchronous, so the pooled connection is
/// wrapped in an [`AsyncConnectionWrapper`] and driven on the blocking pool.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    let start_time = Instant::now();
    let mut conn = pg.get_pooled_connection().await?;
    let initial_status = get_migration_status(&mut conn).await?;

    if initial_status.is_up_to_date() {
        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            applied = initial_status.applied_migrations(),
            "Database schema is up to date"
        );
        return Ok(MigrationResult::success(start_time.elapsed(), Vec::new()));
    }

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        pending = initial_status.pending_migrations(),
        next_version = initial_status.next_pending_version(),
        "Applying pending migrations"
    );

    run_hook("pre_migrate", custom_hooks::pre_migrate(&mut conn)).await?;

    let mut wrapper: AsyncConnectionWrapper<PooledConnection> = conn.into();
    let joined = spawn_blocking(move || {
        let applied = wrapper
            .run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.into_iter().map(|v| v.to_string()).collect::<Vec<_>>());
        (applied, wrapper)
    })
    .await;

    let duration = start_time.elapsed();
    let (applied, mut wrapper) = joined.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            error = %err,
            "Migration task did not complete"
        );
        PgError::Migration(err.into())
    })?;

    let conn: &mut AsyncPgConnection = &mut wrapper;
    run_hook("post_migrate", custom_hooks::post_migrate(conn)).await?;

    let versions = applied.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            error = %err,
            "Database migration failed"
        );
        PgError::Migration(err)
    })?;

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?duration,
        applied = versions.len(),
        "Database migrations applied"
    );

    Ok(MigrationResult::success(duration, versions))
}

async fn run_hook(
    name: &'static str,
    hook: impl Future<Output = PgResult<()>>,
) -> PgResult<()> {
    hook.await.map_err(|err| {
        tracing::error!(target: TRACING_TARGET_MIGRATION, hook = name, error = %err, "Migration hook failed");
        PgError::Migration(format!("{name} hook failed: {err}").into())
    })
}
