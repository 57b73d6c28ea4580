//! Transaction Handler is a web app for tracking customers and their spending.
//!
//! This library provides a JSON REST API for customers, transactions and the
//! reference data that describes them (genders, professions and categories),
//! plus a dashboard that serves HTML pages built on the same services.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rusqlite::ErrorCode;
use tokio::signal;

mod alert;
mod app_state;
mod customer;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod error_response;
mod html;
mod internal_server_error;
mod logging;
mod money;
mod navigation;
mod not_found;
mod reference;
mod routing;
mod seed;
mod time_format;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, Environment};
pub use db::{Database, RetryPolicy, initialize as initialize_db};
pub use logging::logging_middleware;
pub use routing::build_router;
pub use seed::seed_database;
pub use timezone::today;

use crate::{
    alert::Alert, error_response::ErrorResponse, internal_server_error::InternalServerError,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing, blank, too long or otherwise malformed.
    ///
    /// The string describes which field was rejected and why.
    #[error("{0}")]
    Validation(String),

    /// The ID in the request path did not match the ID in the request body.
    #[error("The id in the path does not match the id in the body.")]
    IdMismatch,

    /// A date range was requested where the start date comes after the end date.
    #[error("Start date must be before or equal to end date")]
    InvalidDateRange,

    /// A yearly summary was requested for a year outside of 1900 to 2100.
    #[error("Year must be between 1900 and 2100")]
    YearOutOfRange(i32),

    /// A query was given an ID that does not refer to an existing row, e.g.
    /// a customer with a gender ID that does not exist.
    #[error("a referenced record does not exist, check that the IDs are valid")]
    InvalidForeignKey,

    /// The transaction number is already used by another transaction.
    #[error("the transaction number already exists, choose a different one")]
    DuplicateTransactionNumber,

    /// The row cannot be deleted because other rows still refer to it.
    ///
    /// The string explains which dependents block the delete.
    #[error("{0}")]
    ReferentialConflict(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("The requested resource could not be found.")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl Error {
    /// Whether the error is a temporary failure of the database that is worth
    /// retrying, e.g. another process holding a write lock.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::SqlError(rusqlite::Error::SqliteFailure(error, _)) => matches!(
                error.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::IdMismatch
            | Error::InvalidDateRange
            | Error::YearOutOfRange(_)
            | Error::InvalidForeignKey
            | Error::DuplicateTransactionNumber
            | Error::ReferentialConflict(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 787 => {
                Error::InvalidForeignKey
            }
            // Codes 1555 and 2067 occur when a PRIMARY KEY or UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if (sql_error.extended_code == 1555 || sql_error.extended_code == 2067)
                    && desc.ends_with("transaction.trans_num") =>
            {
                Error::DuplicateTransactionNumber
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            return ErrorResponse::internal(&self.to_string(), &format!("{self:?}"));
        }

        (status_code, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

impl Error {
    /// Render the error as an alert fragment for the HTML views.
    fn into_alert_response(self) -> Response {
        let status_code = self.status_code();

        match self {
            Error::NotFound => Alert::Error {
                message: "Could not find the record".to_owned(),
                details: "Try refreshing the page to see if the record has already been deleted."
                    .to_owned(),
            }
            .into_response_with_status(status_code),
            Error::ReferentialConflict(reason) => Alert::Error {
                message: "Could not delete the record".to_owned(),
                details: reason,
            }
            .into_response_with_status(status_code),
            error if status_code == StatusCode::BAD_REQUEST => Alert::Error {
                message: "Invalid input".to_owned(),
                details: error.to_string(),
            }
            .into_response_with_status(status_code),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                }
                .into_response_with_status(status_code)
            }
        }
    }

    /// Render the error as a full HTML page for the page handlers.
    fn into_page_response(self) -> Response {
        match self {
            Error::NotFound => not_found::get_404_not_found_response(),
            error => {
                tracing::error!("Could not render page: {error}");
                InternalServerError::default().into_response()
            }
        }
    }
}
