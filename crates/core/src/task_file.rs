//! Task Files - One migration script on disk
//!
//! Filenames follow `<date-token>.<description>.<up|down>.<ext>`. The date
//! token orders the migration, the direction segment says which half of the
//! pair the file is, and everything before the direction segment is the
//! logical id shared by both halves.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::date_format::DateFormats;
use crate::errors::{CoreError, CoreResult};

/// Which half of a migration pair a script is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply the change
    Up,
    /// Revert the change
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Parse a filename direction segment, ignoring case
    pub fn from_segment(segment: &str) -> Option<Self> {
        if segment.eq_ignore_ascii_case("up") {
            Some(Direction::Up)
        } else if segment.eq_ignore_ascii_case("down") {
            Some(Direction::Down)
        } else {
            None
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::from_segment(s.trim())
            .ok_or_else(|| format!("unknown direction '{}', expected 'up' or 'down'", s))
    }
}

/// Structural pieces of a filename that matches the grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NameParts<'a> {
    pub date_token: &'a str,
    pub logical_id: &'a str,
    pub direction: Direction,
}

/// Split a filename along the grammar, or `None` when it is not a migration
pub(crate) fn split_name(name: &str) -> Option<NameParts<'_>> {
    let (rest, ext) = name.rsplit_once('.')?;
    let (logical_id, direction) = rest.rsplit_once('.')?;
    let (date_token, description) = logical_id.split_once('.')?;

    if ext.is_empty() || date_token.trim().is_empty() || description.trim().is_empty() {
        return None;
    }

    Some(NameParts {
        date_token,
        logical_id,
        direction: Direction::from_segment(direction)?,
    })
}

/// A migration script discovered on disk
///
/// Immutable once built: the accessors are the only way to read its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFile {
    logical_id: String,
    direction: Direction,
    timestamp: NaiveDate,
    name: String,
    path: PathBuf,
}

impl TaskFile {
    /// Build a task file from a path using the default date formats
    ///
    /// Returns `Ok(None)` when the filename is not a migration at all and
    /// `Err(CoreError::FilenameFormat)` when it looks like one but its date
    /// token cannot be parsed.
    pub fn parse(path: impl AsRef<Path>) -> CoreResult<Option<Self>> {
        Self::parse_with(path, &DateFormats::default())
    }

    /// Same as [`TaskFile::parse`] with an explicit list of date formats
    pub fn parse_with(path: impl AsRef<Path>, formats: &DateFormats) -> CoreResult<Option<Self>> {
        let path = path.as_ref();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return Ok(None),
        };

        let parts = match split_name(name) {
            Some(parts) => parts,
            None => return Ok(None),
        };

        let timestamp = formats
            .parse(parts.date_token)
            .ok_or_else(|| CoreError::FilenameFormat {
                name: name.to_string(),
                token: parts.date_token.to_string(),
            })?;

        Ok(Some(Self {
            logical_id: parts.logical_id.to_string(),
            direction: parts.direction,
            timestamp,
            name: name.to_string(),
            path: path.to_path_buf(),
        }))
    }

    /// Filename stem shared by the up and down halves
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn timestamp(&self) -> NaiveDate {
        self.timestamp
    }

    /// Filename as found on disk
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path of the script on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the script body
    pub fn read_script(&self) -> CoreResult<String> {
        std::fs::read_to_string(&self.path).map_err(|e| CoreError::io(&self.path, e))
    }
}

impl fmt::Display for TaskFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.timestamp)
    }
}
