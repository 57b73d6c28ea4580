//! Implements a struct that holds the state of the REST server.

use axum::extract::FromRef;
use clap::ValueEnum;
use rusqlite::Connection;

use crate::{
    Error,
    db::{Database, RetryPolicy},
};

/// Whether the server is run by a developer or deployed for real use.
///
/// In development mode, the body of a 500 response includes the raw error
/// message and debugging details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    /// Expose internal error details to the client.
    Development,
    /// Hide internal error details from the client.
    #[default]
    Production,
}

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The handle for running queries against the application database.
    pub database: Database,

    /// Whether to expose internal error details to clients.
    pub environment: Environment,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        environment: Environment,
        local_timezone: &str,
        retry_policy: RetryPolicy,
    ) -> Result<Self, Error> {
        let database = Database::new(db_connection, retry_policy)?;

        Ok(Self {
            database,
            environment,
            local_timezone: local_timezone.to_owned(),
        })
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.database.clone()
    }
}

impl FromRef<AppState> for Environment {
    fn from_ref(state: &AppState) -> Self {
        state.environment
    }
}
