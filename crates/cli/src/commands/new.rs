use cassie_core::{CoreError, CoreResult, Direction, FileSelection};
use chrono::{Local, NaiveDate};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Date layout used for new migration names, the first one the scanner tries
const DATE_TOKEN_FORMAT: &str = "%m %d %Y";

fn validate_description(description: &str) -> CoreResult<&str> {
    let trimmed = description.trim();
    let reason = if trimmed.is_empty() {
        Some("description cannot be empty")
    } else if trimmed.contains('.') {
        Some("description cannot contain '.'")
    } else if trimmed.contains('/') || trimmed.contains('\\') {
        Some("description cannot contain path separators")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(CoreError::invalid_migration_name(description, reason)),
        None => Ok(trimmed),
    }
}

fn template(description: &str, direction: Direction, date: NaiveDate) -> String {
    let body = match direction {
        Direction::Up => "-- Add your schema changes here",
        Direction::Down => "-- Revert the schema changes made by the up script",
    };
    format!(
        "-- Migration: {}\n-- Direction: {}\n-- Created: {}\n\n{}\n",
        description, direction, date, body
    )
}

/// Write an up/down pair for `description` dated `date` into `root`
pub fn scaffold(root: &Path, description: &str, extension: &str, date: NaiveDate) -> CoreResult<Vec<PathBuf>> {
    let description = validate_description(description)?;
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        return Err(CoreError::invalid_migration_name(description, "extension cannot be empty"));
    }

    let stem = format!("{}.{}", date.format(DATE_TOKEN_FORMAT), description);
    let mut created = Vec::with_capacity(2);

    for direction in [Direction::Up, Direction::Down] {
        let path = root.join(format!("{}.{}.{}", stem, direction, extension));
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| CoreError::io(&path, e))?;
        file.write_all(template(description, direction, date).as_bytes())
            .map_err(|e| CoreError::io(&path, e))?;
        created.push(path);
    }

    Ok(created)
}

pub fn run(selection: &FileSelection, description: &str, extension: &str) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let created = scaffold(selection.operations_path(), description, extension, today)?;

    for path in created {
        println!("Created migration: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cassie_core::TaskFile;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_scaffold_creates_parseable_pair() {
        let dir = TempDir::new().unwrap();
        let created = scaffold(dir.path(), "add-users-table", "cql", date()).unwrap();

        assert_eq!(created.len(), 2);
        assert!(created[0].ends_with("03 09 2024.add-users-table.up.cql"));
        assert!(created[1].ends_with("03 09 2024.add-users-table.down.cql"));

        let up = TaskFile::parse(&created[0]).unwrap().unwrap();
        let down = TaskFile::parse(&created[1]).unwrap().unwrap();
        assert_eq!(up.timestamp(), date());
        assert_eq!(up.logical_id(), down.logical_id());

        let path = FileSelection::new(dir.path()).unwrap().show_migration_path().unwrap();
        assert!(path.ready());
    }

    #[test]
    fn test_scaffold_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        scaffold(dir.path(), "add-users-table", ".cql", date()).unwrap();
        let err = scaffold(dir.path(), "add-users-table", "cql", date()).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }

    #[test]
    fn test_rejects_bad_descriptions() {
        let dir = TempDir::new().unwrap();
        for description in ["", "   ", "v1.2", "../escape", "a\\b"] {
            let err = scaffold(dir.path(), description, "cql", date()).unwrap_err();
            assert!(matches!(err, CoreError::InvalidMigrationName { .. }), "{:?}", description);
        }
        assert!(scaffold(dir.path(), "ok", "", date()).is_err());
    }
}
