//! cassie-core: discovery, ordering and execution of filename-dated schema migrations
//!
//! Migration scripts live side by side in one directory and are named
//! `<date-token>.<description>.<up|down>.<ext>`. [`FileSelection`] scans the
//! directory, [`MigrationPath`] orders and validates what it found, and
//! [`runner::run`] executes one direction against a [`DestinationDatabase`].

pub mod database;
pub mod date_format;
pub mod errors;
pub mod file_selection;
pub mod migration_path;
pub mod runner;
pub mod task_file;

pub use database::{DestinationDatabase, ScriptOutcome};
pub use date_format::{DateFormat, DateFormats, PatternFormat};
pub use errors::{CoreError, CoreResult};
pub use file_selection::FileSelection;
pub use migration_path::{FailedScript, MigrationPath, MigrationRun};
pub use task_file::{Direction, TaskFile};
