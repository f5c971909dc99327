use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired { field: String, hint: String },

    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Configuration validation failed for '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    pub fn validation_failed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    EnvVar(String),
    Nested,
}

/// Configuration sections loaded from environment variables
pub trait EnvConfig: Sized {
    /// Load from an arbitrary variable lookup
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>;

    /// Load from the process environment
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    fn validate(&self) -> Result<(), ConfigError>;

    /// Variable names backing each field, for diagnostics
    fn config_sources(&self) -> HashMap<String, ConfigSource>;
}

/// Top-level configuration for the cassie binary
#[derive(Debug, Clone)]
pub struct CassieConfig {
    pub migrations_dir: Option<PathBuf>,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Password held only until a connection is made
#[derive(Clone, Default)]
pub struct Credentials {
    password: Option<String>,
}

impl Credentials {
    pub fn new(password: Option<String>) -> Self {
        Self { password }
    }

    pub fn is_empty(&self) -> bool {
        self.password.is_none()
    }

    /// Hand the password out once; later calls return `None`
    pub fn take(&mut self) -> Option<String> {
        self.password.take()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.password {
            Some(_) => f.write_str("Credentials(<redacted>)"),
            None => f.write_str("Credentials(none)"),
        }
    }
}

/// Destination database settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection url; when set it wins over the individual parts
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub credentials: Credentials,
    pub name: String,
    pub connect_timeout: Duration,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(LogFormat::Plain),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::invalid_value(
                "log_format",
                s,
                "plain, pretty, or json",
            )),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse_number<T: FromStr>(field: &str, value: String, expected: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::invalid_value(field, value, expected))
}

impl EnvConfig for CassieConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(CassieConfig {
            migrations_dir: get_optional(lookup, "CASSIE_MIGRATIONS_DIR").map(PathBuf::from),
            database: DatabaseConfig::from_lookup(lookup)?,
            logging: LoggingConfig::from_lookup(lookup)?,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = HashMap::new();
        sources.insert(
            "migrations_dir".to_string(),
            ConfigSource::EnvVar("CASSIE_MIGRATIONS_DIR".to_string()),
        );
        sources.insert("database".to_string(), ConfigSource::Nested);
        sources.insert("logging".to_string(), ConfigSource::Nested);
        sources
    }
}

impl EnvConfig for DatabaseConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = get_or_default(lookup, "CASSIE_DB_PORT", "5432");
        let port = parse_number::<u16>("port", port, "valid port number (1-65535)")?;

        let timeout = get_or_default(lookup, "CASSIE_DB_CONNECT_TIMEOUT_SECS", "5");
        let timeout = parse_number::<u64>("connect_timeout", timeout, "whole number of seconds")?;

        Ok(DatabaseConfig {
            url: get_optional(lookup, "DATABASE_URL"),
            host: get_or_default(lookup, "CASSIE_DB_HOST", "127.0.0.1"),
            port,
            user: get_or_default(lookup, "CASSIE_DB_USER", "postgres"),
            credentials: Credentials::new(get_optional(lookup, "CASSIE_DB_PASSWORD")),
            name: get_or_default(lookup, "CASSIE_DB_NAME", "postgres"),
            connect_timeout: Duration::from_secs(timeout),
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_none() && self.host.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "host".to_string(),
                hint: "Set DATABASE_URL or CASSIE_DB_HOST".to_string(),
            });
        }

        if self.port == 0 {
            return Err(ConfigError::validation_failed(
                "port",
                "Port cannot be 0",
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(ConfigError::validation_failed(
                "connect_timeout",
                "Connect timeout must be at least one second",
            ));
        }

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = HashMap::new();
        for (field, var) in [
            ("url", "DATABASE_URL"),
            ("host", "CASSIE_DB_HOST"),
            ("port", "CASSIE_DB_PORT"),
            ("user", "CASSIE_DB_USER"),
            ("credentials", "CASSIE_DB_PASSWORD"),
            ("name", "CASSIE_DB_NAME"),
            ("connect_timeout", "CASSIE_DB_CONNECT_TIMEOUT_SECS"),
        ] {
            sources.insert(field.to_string(), ConfigSource::EnvVar(var.to_string()));
        }
        sources
    }
}

impl EnvConfig for LoggingConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = get_or_default(lookup, "CASSIE_LOG_FORMAT", "plain");

        Ok(LoggingConfig {
            level: get_or_default(lookup, "CASSIE_LOG_LEVEL", "info").to_lowercase(),
            format: LogFormat::from_str(&format)?,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(ConfigError::invalid_value(
                "log_level",
                self.level.clone(),
                LOG_LEVELS.join(", "),
            ));
        }
        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = HashMap::new();
        sources.insert(
            "level".to_string(),
            ConfigSource::EnvVar("CASSIE_LOG_LEVEL".to_string()),
        );
        sources.insert(
            "format".to_string(),
            ConfigSource::EnvVar("CASSIE_LOG_FORMAT".to_string()),
        );
        sources
    }
}
