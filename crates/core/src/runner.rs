//! Runner - Pre-flight checks followed by one migration run
//!
//! Callers are expected to confirm the database is reachable and the path is
//! ready before migrating. `run` performs both checks in that order and only
//! then hands over to [`MigrationPath::migrate`].

use crate::database::DestinationDatabase;
use crate::errors::{CoreError, CoreResult};
use crate::migration_path::{MigrationPath, MigrationRun};
use crate::task_file::Direction;

/// Verify the connection, check readiness, then migrate in `direction`
pub async fn run<D>(path: &MigrationPath, direction: Direction, database: &D) -> CoreResult<MigrationRun>
where
    D: DestinationDatabase + ?Sized,
{
    if !database.verify_connection().await {
        return Err(CoreError::connection(
            "destination database did not answer the verification query",
        ));
    }

    path.ensure_ready()?;

    let run = path.migrate(direction, database).await?;
    if run.succeeded() {
        tracing::info!(
            %direction,
            applied = run.applied.len(),
            elapsed_ms = run.execution_time_ms as u64,
            "migrations applied"
        );
    } else {
        tracing::warn!(
            %direction,
            applied = run.applied.len(),
            skipped = run.remaining.len(),
            "migration run stopped early, database is partially migrated"
        );
    }

    Ok(run)
}
