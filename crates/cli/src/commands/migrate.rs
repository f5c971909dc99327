use cassie_core::{runner, Direction, FileSelection};

use crate::config::DatabaseConfig;
use crate::destination::SqlDestination;

pub async fn up(selection: &FileSelection, database: DatabaseConfig, json: bool) -> anyhow::Result<()> {
    run(selection, Direction::Up, database, json).await
}

pub async fn down(selection: &FileSelection, database: DatabaseConfig, json: bool) -> anyhow::Result<()> {
    run(selection, Direction::Down, database, json).await
}

async fn run(
    selection: &FileSelection,
    direction: Direction,
    database: DatabaseConfig,
    json: bool,
) -> anyhow::Result<()> {
    let path = selection.show_migration_path()?;
    path.ensure_ready()?;

    let destination = SqlDestination::connect(database).await?;
    let run = runner::run(&path, direction, &destination).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&run)?);
        run.into_result()?;
        return Ok(());
    }

    for name in &run.applied {
        println!("  ✅ {}", name);
    }
    if let Some(failed) = &run.failed {
        println!("  ❌ {}", failed.name);
        if let Some(diagnostic) = &failed.diagnostic {
            println!("     {}", diagnostic);
        }
        for name in &run.remaining {
            println!("  ⏭  {}", name);
        }
    }

    println!(
        "Migrated {}: {} applied, {} not run ({} ms)",
        direction,
        run.applied.len(),
        run.remaining.len() + usize::from(run.failed.is_some()),
        run.execution_time_ms
    );

    run.into_result()?;
    Ok(())
}
