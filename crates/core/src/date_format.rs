//! Date Formats - Ordered parsing strategies for migration date tokens
//!
//! A migration filename starts with a date token such as `01 05 2001` or
//! `march 01 2009`. Several layouts may coexist in one directory, so every
//! token is offered to a list of strategies in priority order and the first
//! one that accepts it wins.

use chrono::NaiveDate;
use std::fmt;

/// A single way of turning a date token into a calendar date
pub trait DateFormat: Send + Sync {
    /// Short human-readable name, used in logs
    fn name(&self) -> &str;

    /// Parse the whole token, or return `None` when this layout does not apply
    fn parse(&self, token: &str) -> Option<NaiveDate>;
}

/// Strategy backed by a chrono format pattern
#[derive(Debug, Clone)]
pub struct PatternFormat {
    pattern: &'static str,
}

impl PatternFormat {
    pub const fn new(pattern: &'static str) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }
}

impl DateFormat for PatternFormat {
    fn name(&self) -> &str {
        self.pattern
    }

    fn parse(&self, token: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(token.trim(), self.pattern).ok()
    }
}

/// Numeric month/day/year layouts, tried first
pub const MONTH_DAY_YEAR_SPACED: PatternFormat = PatternFormat::new("%m %d %Y");
pub const MONTH_DAY_YEAR_DASHED: PatternFormat = PatternFormat::new("%m-%d-%Y");
pub const MONTH_DAY_YEAR_UNDERSCORED: PatternFormat = PatternFormat::new("%m_%d_%Y");

/// Sortable numeric layouts
pub const ISO_DATE: PatternFormat = PatternFormat::new("%Y-%m-%d");
pub const COMPACT_DATE: PatternFormat = PatternFormat::new("%Y%m%d");

/// Month name layouts; chrono accepts full or abbreviated names in any case
pub const MONTH_NAME_DAY_YEAR: PatternFormat = PatternFormat::new("%B %d %Y");
pub const DAY_MONTH_NAME_YEAR: PatternFormat = PatternFormat::new("%d %B %Y");

/// Ordered collection of date strategies
#[derive(Clone)]
pub struct DateFormats {
    formats: Vec<std::sync::Arc<dyn DateFormat>>,
}

impl DateFormats {
    /// An empty list; nothing parses until a strategy is pushed
    pub fn empty() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// Append a strategy with the lowest priority so far
    pub fn push(&mut self, format: impl DateFormat + 'static) -> &mut Self {
        self.formats.push(std::sync::Arc::new(format));
        self
    }

    /// Builder-style variant of [`DateFormats::push`]
    pub fn with(mut self, format: impl DateFormat + 'static) -> Self {
        self.push(format);
        self
    }

    /// Try each strategy in order and return the first successful parse
    pub fn parse(&self, token: &str) -> Option<NaiveDate> {
        self.formats.iter().find_map(|format| {
            let parsed = format.parse(token);
            if parsed.is_some() {
                tracing::trace!(token, format = format.name(), "date token parsed");
            }
            parsed
        })
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.formats.iter().map(|f| f.name()).collect()
    }
}

impl Default for DateFormats {
    fn default() -> Self {
        Self::empty()
            .with(MONTH_DAY_YEAR_SPACED)
            .with(MONTH_DAY_YEAR_DASHED)
            .with(MONTH_DAY_YEAR_UNDERSCORED)
            .with(ISO_DATE)
            .with(COMPACT_DATE)
            .with(MONTH_NAME_DAY_YEAR)
            .with(DAY_MONTH_NAME_YEAR)
    }
}

impl fmt::Debug for DateFormats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
