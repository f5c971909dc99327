//! Shared fixtures for the migration engine integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use cassie_core::{DestinationDatabase, ScriptOutcome};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Five dated up/down pairs mixing numeric and month-name tokens
pub const SAMPLE_MIGRATIONS: [&str; 5] = [
    "01 01 2003.doing-stuff",
    "01 05 2001.doing-whatever",
    "march 01 2009.doing-other-bits",
    "01 08 2006.doing-something",
    "01 02 2010.doing-more-stuff",
];

/// Directory with the sample pairs plus a couple of files that are not migrations
pub fn setup_migrations() -> TempDir {
    let dir = TempDir::new().unwrap();
    for stem in SAMPLE_MIGRATIONS {
        write_script(dir.path(), &format!("{}.up.cql", stem), &format!("-- apply {}", stem));
        write_script(dir.path(), &format!("{}.down.cql", stem), &format!("-- revert {}", stem));
    }
    write_script(dir.path(), "README.md", "# migrations");
    write_script(dir.path(), "keyspace.cql", "CREATE KEYSPACE IF NOT EXISTS testks;");
    dir
}

pub fn write_script(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

/// In-memory database that records every script it receives
#[derive(Default)]
pub struct RecordingDatabase {
    pub reachable: bool,
    pub fail_containing: Option<String>,
    executed: Mutex<Vec<String>>,
}

impl RecordingDatabase {
    pub fn healthy() -> Self {
        Self {
            reachable: true,
            ..Default::default()
        }
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            reachable: true,
            fail_containing: Some(marker.to_string()),
            ..Default::default()
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl DestinationDatabase for RecordingDatabase {
    async fn verify_connection(&self) -> bool {
        self.reachable
    }

    async fn execute(&self, script: &str) -> ScriptOutcome {
        self.executed.lock().unwrap().push(script.to_string());
        match &self.fail_containing {
            Some(marker) if script.contains(marker.as_str()) => {
                ScriptOutcome::failure(format!("rejected script containing '{}'", marker))
            }
            _ => ScriptOutcome::success(),
        }
    }
}
