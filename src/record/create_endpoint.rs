//! Defines the endpoint for creating a transaction record under a wallet.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    fee::suggest_fee,
    record::core::{Record, TransactionType, get_record},
    timezone::local_now,
    wallet::{WalletId, is_valid_cell_number},
};

/// The state needed to create a record.
#[derive(Debug, Clone)]
pub struct CreateRecordState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Manila".
    pub local_timezone: String,
    /// The database connection for storing records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateRecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or updating a record.
///
/// The fee arrives as text because an empty input means "suggest one for me".
#[derive(Debug, Deserialize)]
pub struct RecordForm {
    /// The provider's reference number for the transaction.
    pub reference_number: String,
    /// The counterparty's cell number.
    pub cell_number: String,
    /// The transaction amount.
    pub amount: f64,
    /// The fee charged, or an empty string to use the suggested fee.
    pub fee: String,
    /// Whether the money came in or went out.
    pub transaction_type: TransactionType,
    /// The date the transaction happened.
    pub date: Date,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// A route handler for creating a new record under a wallet.
///
/// Redirects the client to the wallet's record list on success.
pub async fn create_record_endpoint(
    State(state): State<CreateRecordState>,
    Path(wallet_id): Path<WalletId>,
    Form(form): Form<RecordForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_record(wallet_id, &form, &state.local_timezone, &connection) {
        Ok(_) => (
            HxRedirect(format_endpoint(endpoints::RECORDS_VIEW, wallet_id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Resolve the fee for `form`, falling back to the suggestion calculator when
/// the fee input was left blank or could not be parsed.
pub(crate) fn resolve_fee(
    wallet_id: WalletId,
    form: &RecordForm,
    connection: &Connection,
) -> f64 {
    match form.fee.trim() {
        "" => suggest_fee(form.amount, form.transaction_type, wallet_id, connection),
        fee_text => match fee_text.parse::<f64>() {
            Ok(fee) if fee >= 0.0 => fee,
            _ => {
                tracing::warn!("Could not parse fee {fee_text:?}, using suggested fee instead");
                suggest_fee(form.amount, form.transaction_type, wallet_id, connection)
            }
        },
    }
}

pub(crate) fn normalize_notes(notes: &str) -> Option<String> {
    let trimmed = notes.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Create a record in the database.
///
/// New records always start unclaimed. Cash-in records never carry a claimed
/// timestamp.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is zero or negative,
/// - [Error::InvalidCellNumber] if the cell number is not a valid PH number,
/// - [Error::DuplicateReferenceNumber] if the wallet already has a record with
///   the same reference number,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_record(
    wallet_id: WalletId,
    form: &RecordForm,
    local_timezone: &str,
    connection: &Connection,
) -> Result<Record, Error> {
    if form.amount <= 0.0 {
        return Err(Error::InvalidAmount(form.amount));
    }

    if !is_valid_cell_number(&form.cell_number) {
        return Err(Error::InvalidCellNumber(form.cell_number.clone()));
    }

    let fee = resolve_fee(wallet_id, form, connection);
    let notes = normalize_notes(&form.notes);
    let created_at = local_now(local_timezone);

    connection.execute(
        "INSERT INTO record
        (wallet_id, reference_number, cell_number, amount, fee, type, date, claimed_at, notes, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?9)",
        (
            wallet_id,
            form.reference_number.trim(),
            &form.cell_number,
            form.amount,
            fee,
            form.transaction_type,
            form.date,
            &notes,
            created_at,
        ),
    )?;

    let record_id = connection.last_insert_rowid();

    get_record(record_id, connection)
}
