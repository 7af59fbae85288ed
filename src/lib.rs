//! Padala is a web app for tracking cash-in/cash-out transactions across
//! multiple e-wallet providers (G-Cash, PayMaya, etc.).
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod backup;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod fee;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod record;
mod routing;
mod timezone;
mod wallet;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
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
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An empty string was used for a wallet name.
    #[error("wallet name cannot be empty")]
    EmptyWalletName,

    /// The specified wallet name already exists in the database.
    #[error("the wallet \"{0}\" already exists in the database")]
    DuplicateWalletName(String),

    /// A cell number did not match the expected format.
    ///
    /// Valid cell numbers start with '+639' or '09' followed by nine digits.
    #[error("\"{0}\" is not a valid cell number")]
    InvalidCellNumber(String),

    /// A record amount was zero or negative.
    #[error("{0} is not a valid amount, must be greater than zero")]
    InvalidAmount(f64),

    /// The wallet default rate was zero or negative.
    #[error("{0} is not a valid default rate, must be at least 0.01")]
    InvalidDefaultRate(f64),

    /// A record with the same reference number already exists for the wallet.
    ///
    /// Reference numbers identify a transaction with the e-wallet provider, so
    /// two records sharing one within a wallet almost always means the same
    /// transaction was entered twice.
    #[error("a record with this reference number already exists for this wallet")]
    DuplicateReferenceNumber,

    /// A fee range was given a start amount greater than its end amount.
    #[error("invalid amount range: start {start} is greater than end {end}")]
    InvalidAmountRange {
        /// The lower bound the user entered.
        start: f64,
        /// The upper bound the user entered.
        end: f64,
    },

    /// A new fee range's start or end amount falls inside an existing range.
    #[error("the fee range overlaps an existing range for this wallet")]
    FeeRangeOverlap,

    /// Tried to mark a cash-in record as claimed.
    ///
    /// Only cash-out records have a claim lifecycle: the receiving party must
    /// pick up the funds.
    #[error("cash-in records cannot be claimed")]
    ClaimNotApplicable,

    /// Tried to update a wallet that does not exist.
    #[error("tried to update a wallet that is not in the database")]
    UpdateMissingWallet,

    /// Tried to delete a wallet that does not exist.
    #[error("tried to delete a wallet that is not in the database")]
    DeleteMissingWallet,

    /// Tried to update a record that does not exist.
    #[error("tried to update a record that is not in the database")]
    UpdateMissingRecord,

    /// Tried to delete a record that does not exist.
    #[error("tried to delete a record that is not in the database")]
    DeleteMissingRecord,

    /// Tried to update a fee range that does not exist.
    #[error("tried to update a fee range that is not in the database")]
    UpdateMissingFeeRange,

    /// Tried to delete a fee range that does not exist.
    #[error("tried to delete a fee range that is not in the database")]
    DeleteMissingFeeRange,

    /// The multipart form could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The uploaded file was not a JSON file.
    #[error("file is not JSON")]
    NotJson,

    /// The uploaded backup had issues that prevented it from being restored.
    #[error("could not restore the backup file: {0}")]
    InvalidBackup(String),

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JsonSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("record.reference_number") =>
            {
                Error::DuplicateReferenceNumber
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
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::ErrorSimple {
                    message: "The requested resource could not be found.".to_owned(),
                },
            ),
            Error::EmptyWalletName => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "The wallet name cannot be empty.".to_owned(),
                },
            ),
            Error::DuplicateWalletName(name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate Wallet Name".to_owned(),
                    details: format!(
                        "The wallet {name} already exists. Choose a different name, \
                        or edit or delete the existing wallet."
                    ),
                },
            ),
            Error::InvalidCellNumber(number) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid Cell Number".to_owned(),
                    details: format!(
                        "\"{number}\" is not a valid cell number. \
                        Use the format 09XXXXXXXXX or +639XXXXXXXXX."
                    ),
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid Amount".to_owned(),
                    details: format!("{amount} is not a valid amount. Use an amount greater than zero."),
                },
            ),
            Error::InvalidDefaultRate(rate) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid Default Rate".to_owned(),
                    details: format!("{rate} is not a valid rate. Use at least 0.01."),
                },
            ),
            Error::DuplicateReferenceNumber => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate Reference Number".to_owned(),
                    details: "A record with this reference number already exists for this wallet."
                        .to_owned(),
                },
            ),
            Error::InvalidAmountRange { start, end } => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid Amount Range".to_owned(),
                    details: format!(
                        "The start amount {start} is greater than the end amount {end}."
                    ),
                },
            ),
            Error::FeeRangeOverlap => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Overlapping Fee Range".to_owned(),
                    details: "The start or end amount falls inside an existing fee range \
                        for this wallet."
                        .to_owned(),
                },
            ),
            Error::ClaimNotApplicable => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Cash-in records cannot be claimed.".to_owned(),
                },
            ),
            Error::UpdateMissingWallet => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update wallet".to_owned(),
                    details: "The wallet could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingWallet => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete wallet".to_owned(),
                    details: "The wallet could not be found. Try refreshing the page to see \
                        if the wallet has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingRecord => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update record".to_owned(),
                    details: "The record could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingRecord => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete record".to_owned(),
                    details: "The record could not be found. Try refreshing the page to see \
                        if the record has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingFeeRange => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update fee range".to_owned(),
                    details: "The fee range could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingFeeRange => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete fee range".to_owned(),
                    details: "The fee range could not be found. Try refreshing the page to \
                        see if it has already been deleted."
                        .to_owned(),
                },
            ),
            Error::InvalidBackup(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not restore backup".to_owned(),
                    details,
                },
            ),
            Error::NotJson => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "File type must be JSON.".to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: "An unexpected error occurred, check the server logs for \
                            more details."
                            .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
