use cassie_core::{Direction, FileSelection, MigrationPath};
use serde::Serialize;

#[derive(Serialize)]
struct PlanEntry<'a> {
    name: &'a str,
    logical_id: &'a str,
    date: String,
}

#[derive(Serialize)]
struct PlanReport<'a> {
    root: String,
    ready: bool,
    unpaired: Vec<String>,
    duplicates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    up: Option<Vec<PlanEntry<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    down: Option<Vec<PlanEntry<'a>>>,
}

fn entries(path: &MigrationPath, direction: Direction) -> Vec<PlanEntry<'_>> {
    path.path(direction)
        .into_iter()
        .map(|task| PlanEntry {
            name: task.name(),
            logical_id: task.logical_id(),
            date: task.timestamp().to_string(),
        })
        .collect()
}

fn report<'a>(
    selection: &FileSelection,
    path: &'a MigrationPath,
    direction: Option<Direction>,
) -> PlanReport<'a> {
    let wants = |d: Direction| direction.map_or(true, |only| only == d);

    PlanReport {
        root: selection.operations_path().display().to_string(),
        ready: path.ready(),
        unpaired: path.unpaired(),
        duplicates: path.duplicates(),
        up: wants(Direction::Up).then(|| entries(path, Direction::Up)),
        down: wants(Direction::Down).then(|| entries(path, Direction::Down)),
    }
}

pub fn run(selection: &FileSelection, direction: Option<Direction>, json: bool) -> anyhow::Result<()> {
    let path = selection.show_migration_path()?;
    let report = report(selection, &path, direction);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Migration path for {}", report.root);
    for (label, plan) in [("up", &report.up), ("down", &report.down)] {
        if let Some(plan) = plan {
            println!("\n{}:", label);
            if plan.is_empty() {
                println!("  (none)");
            }
            for (index, entry) in plan.iter().enumerate() {
                println!("  {:>3}. {}  {}", index + 1, entry.date, entry.name);
            }
        }
    }

    println!();
    if report.ready {
        println!("Ready: every migration has an up and a down script");
    } else if report.unpaired.is_empty() && report.duplicates.is_empty() {
        println!("Not ready: no migrations found");
    } else {
        if !report.unpaired.is_empty() {
            println!("Not ready: missing counterpart for");
            for id in &report.unpaired {
                println!("  - {}", id);
            }
        }
        if !report.duplicates.is_empty() {
            println!("Not ready: more than one script in one direction for");
            for id in &report.duplicates {
                println!("  - {}", id);
            }
        }
    }

    Ok(())
}
