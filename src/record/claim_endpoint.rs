//! Defines the endpoint for marking a cash-out record as claimed.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{Html, IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    record::{
        core::{Record, RecordId, get_record},
        records_page::record_row,
    },
    timezone::local_now,
};

/// The state needed to claim a record.
#[derive(Debug, Clone)]
pub struct ClaimRecordState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Manila".
    pub local_timezone: String,
    /// The database connection for updating records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ClaimRecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that marks a cash-out record as claimed.
///
/// Responds with the re-rendered table row so htmx can swap it in place.
pub async fn claim_record_endpoint(
    State(state): State<ClaimRecordState>,
    Path(record_id): Path<RecordId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match claim_record(record_id, &state.local_timezone, &connection) {
        Ok(record) => Html(record_row(&record).into_string()).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Set a cash-out record's claimed timestamp to now.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `record_id` does not refer to a valid record,
/// - [Error::ClaimNotApplicable] if the record is a cash-in or was already
///   claimed,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn claim_record(
    record_id: RecordId,
    local_timezone: &str,
    connection: &Connection,
) -> Result<Record, Error> {
    let claimed_at = local_now(local_timezone);

    let rows_affected = connection.execute(
        "UPDATE record SET claimed_at = ?1
        WHERE id = ?2 AND type = 'cash-out' AND claimed_at IS NULL",
        (claimed_at, record_id),
    )?;

    if rows_affected == 0 {
        // Work out whether the record is missing or just not claimable.
        return match get_record(record_id, connection) {
            Ok(_) => Err(Error::ClaimNotApplicable),
            Err(error) => Err(error),
        };
    }

    get_record(record_id, connection)
}
