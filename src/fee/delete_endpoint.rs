//! Defines the endpoint for deleting a fee range.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    fee::{adjustment::adjust_record_fees, core::{FeeRangeId, get_fee_range}},
};

/// The state needed to delete a fee range.
#[derive(Debug, Clone)]
pub struct DeleteFeeRangeState {
    /// The database connection for managing fee ranges.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteFeeRangeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a fee range, responds with an alert.
pub async fn delete_fee_range_endpoint(
    State(state): State<DeleteFeeRangeState>,
    Path(fee_range_id): Path<FeeRangeId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_fee_range(fee_range_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(rows_affected) if rows_affected != 0 => Alert::SuccessSimple {
            message: "Fee range deleted successfully".to_owned(),
        }
        .into_response(),
        Ok(_) => Error::DeleteMissingFeeRange.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete fee range {fee_range_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

/// Delete a fee range, first moving records that carry its fee back onto the
/// fee the calculator suggests without it.
fn delete_fee_range(id: FeeRangeId, connection: &Connection) -> Result<RowsAffected, Error> {
    let range = match get_fee_range(id, connection) {
        Ok(range) => range,
        Err(Error::NotFound) => return Ok(0),
        Err(error) => return Err(error),
    };

    let transaction = connection.unchecked_transaction()?;

    adjust_record_fees(&range, true, &transaction)?;

    let rows_affected =
        transaction.execute("DELETE FROM fee_range WHERE id = :id", &[(":id", &id)])?;

    transaction.commit()?;

    Ok(rows_affected)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        fee::{
            core::list_fee_ranges,
            create_endpoint::{FeeRangeForm, create_fee_range},
        },
        initialize_db,
        record::{
            TransactionType, get_record,
            create_endpoint::{RecordForm, create_record},
        },
    };

    use super::delete_fee_range;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();
        conn.execute(
            "INSERT INTO wallet (id, name, slug, cell_number, wallet_type, default_rate)
            VALUES (1, 'Main GCash', 'main-gcash', '09171234567', 'GCash', 0.02)",
            (),
        )
        .unwrap();
        conn
    }

    fn test_range_form() -> FeeRangeForm {
        FeeRangeForm {
            amount_start: 100.0,
            amount_end: 500.0,
            fee: 15.0,
            date_implemented: date!(2025 - 01 - 01),
        }
    }

    #[test]
    fn deletes_fee_range() {
        let conn = get_test_connection();
        let range = create_fee_range(1, &test_range_form(), &conn).unwrap();

        let rows_affected = delete_fee_range(range.id, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert!(list_fee_ranges(1, &conn).unwrap().is_empty());
    }

    #[test]
    fn deleting_range_reverts_automatic_record_fees() {
        let conn = get_test_connection();
        let range = create_fee_range(1, &test_range_form(), &conn).unwrap();
        // A blank fee takes the range's 15 while it is in effect.
        let record = create_record(
            1,
            &RecordForm {
                reference_number: "REF-100".to_owned(),
                cell_number: "09179876543".to_owned(),
                amount: 300.0,
                fee: String::new(),
                transaction_type: TransactionType::CashIn,
                date: date!(2025 - 06 - 15),
                notes: String::new(),
            },
            "Asia/Manila",
            &conn,
        )
        .unwrap();
        assert_eq!(record.fee, 15.0);

        delete_fee_range(range.id, &conn).unwrap();

        // Back to the ladder fee for 300 at the 2% rate.
        assert_eq!(get_record(record.id, &conn).unwrap().fee, 10.0);
    }

    #[test]
    fn deleting_missing_range_affects_no_rows() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();

        let rows_affected = delete_fee_range(42, &conn).unwrap();

        assert_eq!(rows_affected, 0);
    }
}
