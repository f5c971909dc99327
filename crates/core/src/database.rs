//! Destination Database - The seam between the engine and a real database
//!
//! The engine only needs two things from a database: a way to confirm it is
//! reachable and a way to run one script. Connection handling, credentials
//! and query primitives all live behind this trait.

use async_trait::async_trait;

/// Result of executing one script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutcome {
    pub success: bool,
    pub diagnostic: Option<String>,
}

impl ScriptOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            diagnostic: None,
        }
    }

    pub fn failure(diagnostic: impl Into<String>) -> Self {
        Self {
            success: false,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Database that migration scripts are applied to
///
/// Implementations must not retry on their own account; the engine treats
/// every outcome as final.
#[async_trait]
pub trait DestinationDatabase: Send + Sync {
    /// Check that the database is reachable
    async fn verify_connection(&self) -> bool;

    /// Execute one script and report whether it succeeded
    async fn execute(&self, script: &str) -> ScriptOutcome;
}
