//! Defines the endpoint for updating a transaction record.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    record::{
        core::{Record, RecordId, TransactionType, get_record},
        create_endpoint::{RecordForm, normalize_notes, resolve_fee},
    },
    wallet::is_valid_cell_number,
};

/// The state needed to update a record.
#[derive(Debug, Clone)]
pub struct EditRecordState {
    /// The database connection for updating records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditRecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating an existing record.
///
/// Redirects the client to the owning wallet's record list on success.
pub async fn edit_record_endpoint(
    State(state): State<EditRecordState>,
    Path(record_id): Path<RecordId>,
    Form(form): Form<RecordForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_record(record_id, &form, &connection) {
        Ok(record) => (
            HxRedirect(format_endpoint(endpoints::RECORDS_VIEW, record.wallet_id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Update a record in the database.
///
/// Changing a record to cash-in clears its claimed timestamp, since only
/// cash-out records can be claimed.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingRecord] if `record_id` does not refer to a valid
///   record,
/// - [Error::InvalidAmount] if the amount is zero or negative,
/// - [Error::InvalidCellNumber] if the cell number is not a valid PH number,
/// - [Error::DuplicateReferenceNumber] if the owning wallet already has
///   another record with the same reference number,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_record(
    record_id: RecordId,
    form: &RecordForm,
    connection: &Connection,
) -> Result<Record, Error> {
    if form.amount <= 0.0 {
        return Err(Error::InvalidAmount(form.amount));
    }

    if !is_valid_cell_number(&form.cell_number) {
        return Err(Error::InvalidCellNumber(form.cell_number.clone()));
    }

    let existing = match get_record(record_id, connection) {
        Ok(record) => record,
        Err(Error::NotFound) => return Err(Error::UpdateMissingRecord),
        Err(error) => return Err(error),
    };

    let fee = resolve_fee(existing.wallet_id, form, connection);
    let notes = normalize_notes(&form.notes);

    let rows_affected = if form.transaction_type == TransactionType::CashIn {
        connection.execute(
            "UPDATE record
            SET reference_number = ?1, cell_number = ?2, amount = ?3, fee = ?4,
                type = ?5, date = ?6, notes = ?7, claimed_at = NULL
            WHERE id = ?8",
            (
                form.reference_number.trim(),
                &form.cell_number,
                form.amount,
                fee,
                form.transaction_type,
                form.date,
                &notes,
                record_id,
            ),
        )?
    } else {
        connection.execute(
            "UPDATE record
            SET reference_number = ?1, cell_number = ?2, amount = ?3, fee = ?4,
                type = ?5, date = ?6, notes = ?7
            WHERE id = ?8",
            (
                form.reference_number.trim(),
                &form.cell_number,
                form.amount,
                fee,
                form.transaction_type,
                form.date,
                &notes,
                record_id,
            ),
        )?
    };

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecord);
    }

    get_record(record_id, connection)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        endpoints::{self, format_endpoint},
        initialize_db,
        record::core::{Record, TransactionType},
        record::create_endpoint::{RecordForm, create_record},
        test_utils::assert_hx_redirect,
        wallet::create_endpoint::{WalletForm, create_wallet},
    };

    use super::{EditRecordState, edit_record_endpoint, update_record};

    fn get_test_state_with_record() -> (EditRecordState, Record) {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        let wallet = create_wallet(
            &WalletForm {
                name: "Main GCash".to_owned(),
                cell_number: "09171234567".to_owned(),
                wallet_type: "GCash".to_owned(),
                default_rate: 0.02,
            },
            &connection,
        )
        .unwrap();

        let record = create_record(
            wallet.id,
            &RecordForm {
                reference_number: "REF-100".to_owned(),
                cell_number: "09179876543".to_owned(),
                amount: 1000.0,
                fee: "20".to_owned(),
                transaction_type: TransactionType::CashOut,
                date: date!(2025 - 06 - 15),
                notes: String::new(),
            },
            "Asia/Manila",
            &connection,
        )
        .unwrap();

        (
            EditRecordState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            record,
        )
    }

    fn get_update_form() -> RecordForm {
        RecordForm {
            reference_number: "REF-200".to_owned(),
            cell_number: "09179876543".to_owned(),
            amount: 1500.0,
            fee: "30".to_owned(),
            transaction_type: TransactionType::CashOut,
            date: date!(2025 - 06 - 16),
            notes: "resent".to_owned(),
        }
    }

    #[tokio::test]
    async fn redirects_to_records_page_on_success() {
        let (state, record) = get_test_state_with_record();
        let wallet_id = record.wallet_id;

        let response =
            edit_record_endpoint(State(state), Path(record.id), Form(get_update_form())).await;

        assert_hx_redirect(&response, &format_endpoint(endpoints::RECORDS_VIEW, wallet_id));
    }

    #[test]
    fn updates_record_fields() {
        let (state, record) = get_test_state_with_record();
        let connection = state.db_connection.lock().unwrap();

        let updated = update_record(record.id, &get_update_form(), &connection).unwrap();

        assert_eq!(updated.reference_number, "REF-200");
        assert_eq!(updated.amount, 1500.0);
        assert_eq!(updated.fee, 30.0);
        assert_eq!(updated.notes, Some("resent".to_owned()));
    }

    #[test]
    fn changing_to_cash_in_clears_claimed_at() {
        let (state, record) = get_test_state_with_record();
        let connection = state.db_connection.lock().unwrap();

        connection
            .execute(
                "UPDATE record SET claimed_at = '2025-06-16 10:00:00+00:00' WHERE id = ?1",
                (record.id,),
            )
            .unwrap();

        let form = RecordForm {
            transaction_type: TransactionType::CashIn,
            ..get_update_form()
        };

        let updated = update_record(record.id, &form, &connection).unwrap();

        assert_eq!(updated.transaction_type, TransactionType::CashIn);
        assert_eq!(updated.claimed_at, None);
    }

    #[test]
    fn rejects_non_positive_amount() {
        let (state, record) = get_test_state_with_record();
        let connection = state.db_connection.lock().unwrap();

        let form = RecordForm {
            amount: 0.0,
            ..get_update_form()
        };

        let result = update_record(record.id, &form, &connection);

        assert_eq!(result, Err(Error::InvalidAmount(0.0)));
    }

    #[test]
    fn rejects_missing_record() {
        let (state, _) = get_test_state_with_record();
        let connection = state.db_connection.lock().unwrap();

        let result = update_record(42, &get_update_form(), &connection);

        assert_eq!(result, Err(Error::UpdateMissingRecord));
    }

    #[test]
    fn rejects_renaming_to_existing_reference_number() {
        let (state, record) = get_test_state_with_record();
        let connection = state.db_connection.lock().unwrap();

        create_record(
            record.wallet_id,
            &RecordForm {
                reference_number: "REF-300".to_owned(),
                ..get_update_form()
            },
            "Asia/Manila",
            &connection,
        )
        .unwrap();

        let form = RecordForm {
            reference_number: "REF-300".to_owned(),
            ..get_update_form()
        };

        let result = update_record(record.id, &form, &connection);

        assert_eq!(result, Err(Error::DuplicateReferenceNumber));
    }
}
