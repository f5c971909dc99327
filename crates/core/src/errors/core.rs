use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for migration engine operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type for the migration engine
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Migration file '{name}' has a date token '{token}' that no supported format can parse")]
    FilenameFormat { name: String, token: String },

    #[error("Migration path is not ready: {}", describe_pairing(.unpaired, .duplicates))]
    PairingIncomplete {
        unpaired: Vec<String>,
        duplicates: Vec<String>,
    },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Script '{name}' failed: {message}")]
    ScriptExecution { name: String, message: String },

    #[error("Invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },
}

fn describe_pairing(unpaired: &[String], duplicates: &[String]) -> String {
    let mut problems = Vec::new();
    if !unpaired.is_empty() {
        problems.push(format!("missing up/down counterpart for {}", unpaired.join(", ")));
    }
    if !duplicates.is_empty() {
        problems.push(format!(
            "more than one script in one direction for {}",
            duplicates.join(", ")
        ));
    }

    if problems.is_empty() {
        "no migrations were found".to_string()
    } else {
        problems.join("; ")
    }
}

impl CoreError {
    /// Create an IO error bound to the path that caused it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a new script execution error
    pub fn script_execution(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ScriptExecution {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid migration name error
    pub fn invalid_migration_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMigrationName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error is a filename format error
    pub fn is_filename_format(&self) -> bool {
        matches!(self, Self::FilenameFormat { .. })
    }

    /// Check if the error is a pairing precondition failure
    pub fn is_pairing_incomplete(&self) -> bool {
        matches!(self, Self::PairingIncomplete { .. })
    }

    /// Check if the error is a connection precondition failure
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}
