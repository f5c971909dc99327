//! Destination Database - sqlx-backed implementation of the engine's database seam
//!
//! One dedicated connection is opened per invocation. Scripts are split into
//! statements and executed in order on that connection; the first failing
//! statement fails the whole script.

use async_trait::async_trait;
use cassie_core::{CoreError, CoreResult, DestinationDatabase, ScriptOutcome};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::ConnectOptions;
use std::str::FromStr;
use tokio::sync::Mutex;

use crate::config::DatabaseConfig;

/// Destination database reached through a single sqlx connection
pub struct SqlDestination {
    connection: Mutex<PgConnection>,
}

impl SqlDestination {
    /// Open the connection described by `config`
    ///
    /// The config is consumed: the password leaves the credentials while the
    /// connect options are built and is dropped together with those options
    /// once the connection is up.
    pub async fn connect(mut config: DatabaseConfig) -> CoreResult<Self> {
        tracing::debug!(
            from_url = config.url.is_some(),
            password = !config.credentials.is_empty(),
            "opening destination connection"
        );

        let options = connect_options(&mut config)
            .map_err(|e| CoreError::connection(format!("invalid connection settings: {}", e)))?;

        let connection = tokio::time::timeout(config.connect_timeout, options.connect())
            .await
            .map_err(|_| {
                CoreError::connection(format!(
                    "timed out after {}s connecting to the destination database",
                    config.connect_timeout.as_secs()
                ))
            })?
            .map_err(|e| CoreError::connection(e.to_string()))?;
        drop(options);

        tracing::debug!("connected to destination database");

        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

fn connect_options(config: &mut DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    if let Some(url) = config.url.take() {
        return PgConnectOptions::from_str(&url);
    }

    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .database(&config.name);

    if let Some(password) = config.credentials.take() {
        options = options.password(&password);
    }

    Ok(options)
}

/// Split a script into executable statements
///
/// Scripts the SQL parser understands are re-rendered statement by statement.
/// Anything else, such as CQL-only syntax, falls back to splitting on `;`.
pub fn split_statements(script: &str) -> Vec<String> {
    let dialect = GenericDialect {};

    match Parser::parse_sql(&dialect, script) {
        Ok(parsed) => parsed.iter().map(|stmt| format!("{};", stmt)).collect(),
        Err(e) => {
            tracing::debug!("script is not plain SQL, using semicolon splitting: {}", e);
            naive_split(script)
        }
    }
}

fn naive_split(script: &str) -> Vec<String> {
    script
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("{};", s))
        .collect()
}

#[async_trait]
impl DestinationDatabase for SqlDestination {
    async fn verify_connection(&self) -> bool {
        let mut connection = self.connection.lock().await;
        match sqlx::query("SELECT 1").execute(&mut *connection).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("connection verification failed: {}", e);
                false
            }
        }
    }

    async fn execute(&self, script: &str) -> ScriptOutcome {
        let statements = split_statements(script);
        let mut connection = self.connection.lock().await;

        for (index, statement) in statements.iter().enumerate() {
            if let Err(e) = sqlx::query(statement).execute(&mut *connection).await {
                return ScriptOutcome::failure(format!(
                    "statement {} of {} failed: {}",
                    index + 1,
                    statements.len(),
                    e
                ));
            }
        }

        ScriptOutcome::success()
            .with_diagnostic(format!("{} statement(s) executed", statements.len()))
    }
}
