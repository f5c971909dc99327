mod common;

use cassie_core::{runner, Direction, FileSelection, MigrationPath};
use common::{setup_migrations, write_script, RecordingDatabase};
use serial_test::serial;
use std::fs;
use std::path::Path;

fn names(path: &MigrationPath, direction: Direction) -> Vec<String> {
    path.path(direction)
        .iter()
        .map(|t| t.name().to_string())
        .collect()
}

#[test]
fn test_correct_number_of_tasks_derived_from_files() {
    let dir = setup_migrations();
    let files = FileSelection::new(dir.path()).unwrap().get_files().unwrap();
    assert_eq!(files.len(), 10);
}

#[test]
fn test_migration_files_exist() {
    let dir = setup_migrations();
    let selection = FileSelection::new(dir.path()).unwrap();
    assert!(selection.prospective_migrations_exist().unwrap());
}

#[test]
fn test_tasks_are_ordered_for_up_migration() {
    let dir = setup_migrations();
    let path = FileSelection::new(dir.path()).unwrap().show_migration_path().unwrap();

    assert_eq!(
        names(&path, Direction::Up),
        vec![
            "01 05 2001.doing-whatever.up.cql",
            "01 01 2003.doing-stuff.up.cql",
            "01 08 2006.doing-something.up.cql",
            "march 01 2009.doing-other-bits.up.cql",
            "01 02 2010.doing-more-stuff.up.cql",
        ]
    );
}

#[test]
fn test_tasks_are_ordered_for_down_migration() {
    let dir = setup_migrations();
    let path = FileSelection::new(dir.path()).unwrap().show_migration_path().unwrap();

    let up: Vec<String> = path
        .path(Direction::Up)
        .iter()
        .map(|t| t.logical_id().to_string())
        .collect();
    let mut down: Vec<String> = path
        .path(Direction::Down)
        .iter()
        .map(|t| t.logical_id().to_string())
        .collect();
    down.reverse();

    assert_eq!(up, down);
    assert!(path
        .path(Direction::Down)
        .iter()
        .all(|t| t.direction() == Direction::Down));
    assert!(path
        .path(Direction::Up)
        .iter()
        .all(|t| t.direction() == Direction::Up));
}

#[test]
fn test_path_is_strictly_ordered_by_timestamp() {
    let dir = setup_migrations();
    let path = FileSelection::new(dir.path()).unwrap().show_migration_path().unwrap();

    let up = path.path(Direction::Up);
    assert!(up.windows(2).all(|w| w[0].timestamp() < w[1].timestamp()));

    let down = path.path(Direction::Down);
    assert!(down.windows(2).all(|w| w[0].timestamp() > w[1].timestamp()));
}

#[test]
fn test_tasks_are_ready_for_migration_execution() {
    let dir = setup_migrations();
    let path = FileSelection::new(dir.path()).unwrap().show_migration_path().unwrap();
    assert!(path.ready());
    assert!(path.unpaired().is_empty());
}

#[test]
fn test_missing_counterpart_makes_path_not_ready() {
    let dir = setup_migrations();
    fs::remove_file(dir.path().join("01 08 2006.doing-something.down.cql")).unwrap();

    let path = FileSelection::new(dir.path()).unwrap().show_migration_path().unwrap();
    assert!(!path.ready());
    assert_eq!(path.unpaired(), vec!["01 08 2006.doing-something".to_string()]);
}

#[test]
fn test_unparseable_date_fails_the_scan() {
    let dir = setup_migrations();
    write_script(dir.path(), "thirteenth 01 2011.doing-nothing.up.cql", "-- nope");

    let err = FileSelection::new(dir.path()).unwrap().get_files().unwrap_err();
    assert!(err.is_filename_format());
    assert!(err.to_string().contains("thirteenth 01 2011"));
}

#[tokio::test]
async fn test_full_up_then_down_cycle() {
    let dir = setup_migrations();
    let path = FileSelection::new(dir.path()).unwrap().show_migration_path().unwrap();
    let database = RecordingDatabase::healthy();

    let up = runner::run(&path, Direction::Up, &database).await.unwrap();
    assert!(up.succeeded());
    assert_eq!(up.applied.len(), 5);

    let down = runner::run(&path, Direction::Down, &database).await.unwrap();
    assert!(down.succeeded());
    assert_eq!(down.applied.len(), 5);

    let executed = database.executed();
    assert_eq!(executed.len(), 10);
    assert_eq!(executed[0], "-- apply 01 05 2001.doing-whatever");
    assert_eq!(executed[4], "-- apply 01 02 2010.doing-more-stuff");
    assert_eq!(executed[5], "-- revert 01 02 2010.doing-more-stuff");
    assert_eq!(executed[9], "-- revert 01 05 2001.doing-whatever");
}

#[tokio::test]
async fn test_repeated_up_reapplies_every_script() {
    let dir = setup_migrations();
    let path = FileSelection::new(dir.path()).unwrap().show_migration_path().unwrap();
    let database = RecordingDatabase::healthy();

    assert!(path.migrate(Direction::Up, &database).await.unwrap().succeeded());
    assert!(path.migrate(Direction::Up, &database).await.unwrap().succeeded());
    assert_eq!(database.executed().len(), 10);
}

#[tokio::test]
async fn test_failure_halts_remaining_scripts() {
    let dir = setup_migrations();
    let path = FileSelection::new(dir.path()).unwrap().show_migration_path().unwrap();
    let database = RecordingDatabase::failing_on("march 01 2009");

    let run = runner::run(&path, Direction::Down, &database).await.unwrap();
    assert!(!run.succeeded());
    assert_eq!(run.applied, vec!["01 02 2010.doing-more-stuff.down.cql"]);
    assert_eq!(
        run.failed.as_ref().map(|f| f.name.as_str()),
        Some("march 01 2009.doing-other-bits.down.cql")
    );
    assert_eq!(run.remaining.len(), 3);
    assert_eq!(database.executed().len(), 2);
}

#[tokio::test]
async fn test_unreachable_database_blocks_run() {
    let dir = setup_migrations();
    let path = FileSelection::new(dir.path()).unwrap().show_migration_path().unwrap();
    let database = RecordingDatabase::default();

    let err = runner::run(&path, Direction::Up, &database).await.unwrap_err();
    assert!(err.is_connection());
    assert!(database.executed().is_empty());
}

#[test]
#[serial]
fn test_default_path_is_working_directory() {
    let selection = FileSelection::current_dir().unwrap();
    assert_eq!(selection.operations_path(), std::env::current_dir().unwrap());
}

#[test]
#[serial]
fn test_missing_path_falls_back_to_working_directory() {
    let selection = FileSelection::new("/this/does/not/exist").unwrap();
    assert_eq!(selection.operations_path(), std::env::current_dir().unwrap());
}

#[test]
#[serial]
fn test_existing_relative_path_is_reported_verbatim() {
    let original = std::env::current_dir().unwrap();
    let scratch = tempfile::TempDir::new().unwrap();
    std::env::set_current_dir(scratch.path()).unwrap();

    fs::create_dir("newpath").unwrap();
    let selection = FileSelection::new("newpath").unwrap();
    let reported = selection.operations_path().to_path_buf();

    std::env::set_current_dir(original).unwrap();
    assert_eq!(reported, Path::new("newpath"));
}
