//! Defines the endpoint for deleting a transaction record.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, record::core::RecordId};

/// The state needed to delete a record.
#[derive(Debug, Clone)]
pub struct DeleteRecordState {
    /// The database connection for managing records.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteRecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a record, responds with an alert.
pub async fn delete_record_endpoint(
    State(state): State<DeleteRecordState>,
    Path(record_id): Path<RecordId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_record(record_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(rows_affected) if rows_affected != 0 => Alert::SuccessSimple {
            message: "Record deleted successfully".to_owned(),
        }
        .into_response(),
        Ok(_) => Error::DeleteMissingRecord.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete record {record_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn delete_record(id: RecordId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM record WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}
