//! File Selection - Discovers migration scripts in a root directory
//!
//! The root is fixed when the selection is built. A requested root that is
//! not an existing directory falls back to the process working directory; to
//! scan a different directory, build a new selection.

use std::fs;
use std::path::{Path, PathBuf};

use crate::date_format::DateFormats;
use crate::errors::{CoreError, CoreResult};
use crate::migration_path::MigrationPath;
use crate::task_file::{split_name, TaskFile};

/// Scanner for migration files directly under one directory
#[derive(Debug, Clone)]
pub struct FileSelection {
    root: PathBuf,
    formats: DateFormats,
}

impl FileSelection {
    /// Select files under `path`, or under the working directory if it is not a directory
    pub fn new(path: impl AsRef<Path>) -> CoreResult<Self> {
        Self::with_formats(Some(path.as_ref()), DateFormats::default())
    }

    /// Select files under the process working directory
    pub fn current_dir() -> CoreResult<Self> {
        Self::with_formats(None, DateFormats::default())
    }

    /// Resolve an optional root with a custom list of date formats
    pub fn with_formats(path: Option<&Path>, formats: DateFormats) -> CoreResult<Self> {
        let root = resolve_root(path)?;
        Ok(Self { root, formats })
    }

    /// Effective root directory used for scanning
    pub fn operations_path(&self) -> &Path {
        &self.root
    }

    /// All migration files directly under the root, in no particular order
    ///
    /// Names outside the filename grammar are skipped. A name that has the
    /// grammar's shape but an unparseable date token aborts the scan.
    pub fn get_files(&self) -> CoreResult<Vec<TaskFile>> {
        let mut files = Vec::new();

        for path in self.candidate_paths()? {
            match TaskFile::parse_with(&path, &self.formats)? {
                Some(task) => {
                    tracing::debug!(
                        file = task.name(),
                        direction = %task.direction(),
                        timestamp = %task.timestamp(),
                        "discovered migration"
                    );
                    files.push(task);
                }
                None => {
                    tracing::debug!(path = %path.display(), "skipping non-migration file");
                }
            }
        }

        Ok(files)
    }

    /// True if at least one file under the root has the migration filename shape
    pub fn prospective_migrations_exist(&self) -> CoreResult<bool> {
        Ok(self.candidate_paths()?.iter().any(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(split_name)
                .is_some()
        }))
    }

    /// Scan the root and build a migration path from the result
    pub fn show_migration_path(&self) -> CoreResult<MigrationPath> {
        Ok(MigrationPath::new(self.get_files()?))
    }

    fn candidate_paths(&self) -> CoreResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.root).map_err(|e| CoreError::io(&self.root, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::io(&self.root, e))?;
            let path = entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }

        Ok(paths)
    }
}

fn resolve_root(path: Option<&Path>) -> CoreResult<PathBuf> {
    match path {
        Some(path) if path.is_dir() => Ok(path.to_path_buf()),
        Some(path) => {
            let cwd = working_dir()?;
            tracing::warn!(
                requested = %path.display(),
                fallback = %cwd.display(),
                "migration directory is missing or not a directory, using the working directory"
            );
            Ok(cwd)
        }
        None => working_dir(),
    }
}

fn working_dir() -> CoreResult<PathBuf> {
    std::env::current_dir().map_err(|e| CoreError::io(".", e))
}
