//! Database initialization and the handle used to run queries.
//!
//! All access to the SQLite connection goes through [Database], which
//! serializes access to the connection, wraps writes in a SQL transaction and
//! retries transient failures according to a [RetryPolicy].

use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    customer::create_customer_table,
    reference::{Category, Gender, Profession, create_reference_table},
    transaction::create_transaction_table,
};

/// The delay before the first retry of a transient failure.
const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(100);

/// How to handle transient database failures, e.g. another process holding a
/// write lock on the database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// How many times a failed operation is retried before giving up.
    pub max_retries: u32,
    /// The upper bound on the delay between two attempts.
    pub max_delay: Duration,
    /// How long a single statement may wait for a lock before failing.
    pub command_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            max_delay: Duration::from_secs(30),
            command_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Run `operation`, retrying it while it fails with a transient error and
    /// the retry budget is not exhausted.
    ///
    /// Non-transient errors are returned immediately.
    pub fn retry<T>(&self, mut operation: impl FnMut() -> Result<T, Error>) -> Result<T, Error> {
        let mut attempt = 0;

        loop {
            match operation() {
                Err(error) if error.is_transient() && attempt < self.max_retries => {
                    let delay = self.delay_for_attempt(attempt);
                    tracing::warn!(
                        "transient database error on attempt {}: {error}, retrying in {delay:?}",
                        attempt + 1
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        INITIAL_RETRY_DELAY
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

/// A shared handle to the application database.
#[derive(Debug, Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
    retry_policy: RetryPolicy,
}

impl Database {
    /// Wrap `connection`, creating the application tables if needed.
    ///
    /// # Errors
    /// Returns an error if the busy timeout cannot be set or the tables cannot
    /// be created.
    pub fn new(connection: Connection, retry_policy: RetryPolicy) -> Result<Self, Error> {
        connection.busy_timeout(retry_policy.command_timeout)?;
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            retry_policy,
        })
    }

    /// Run `operation` with exclusive access to the connection.
    ///
    /// The connection is locked for each attempt and released before waiting
    /// to retry, so other requests can use it during the backoff.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLockError] if the lock is poisoned, otherwise
    /// whatever `operation` returns after the retry budget is used up.
    pub fn run<T>(
        &self,
        mut operation: impl FnMut(&Connection) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.retry_policy.retry(|| {
            let connection = self
                .connection
                .lock()
                .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
                .map_err(|_| Error::DatabaseLockError)?;

            operation(&connection)
        })
    }

    /// Run `operation` inside a single SQL transaction.
    ///
    /// The transaction is committed if `operation` succeeds and rolled back
    /// otherwise, so a retried attempt never sees a half applied write.
    pub fn run_in_transaction<T>(
        &self,
        mut operation: impl FnMut(&Connection) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.run(|connection| {
            let transaction = connection.unchecked_transaction()?;
            let result = operation(&*transaction)?;
            transaction.commit()?;

            Ok(result)
        })
    }
}

/// Create all of the application tables.
///
/// Foreign key enforcement is enabled for `connection` since SQLite leaves it
/// off by default.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_reference_table::<Gender>(&transaction)?;
    create_reference_table::<Profession>(&transaction)?;
    create_reference_table::<Category>(&transaction)?;
    create_customer_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
