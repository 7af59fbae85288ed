//! Defines the endpoint for updating a fee range.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::{Connection, params};

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    fee::{
        core::{FeeRange, FeeRangeId, get_fee_range, is_fee_in_existing_range},
        create_endpoint::FeeRangeForm,
    },
};

/// The state needed to update a fee range.
#[derive(Debug, Clone)]
pub struct EditFeeRangeState {
    /// The database connection for managing fee ranges.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditFeeRangeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating an existing fee range.
///
/// Redirects the client to the owning wallet's fee ranges view on success.
pub async fn edit_fee_range_endpoint(
    State(state): State<EditFeeRangeState>,
    Path(fee_range_id): Path<FeeRangeId>,
    Form(form): Form<FeeRangeForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_fee_range(fee_range_id, &form, &connection) {
        Ok(range) => (
            HxRedirect(format_endpoint(endpoints::FEE_RANGES_VIEW, range.wallet_id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Update a fee range in the database.
///
/// The overlap check skips the range being edited, so shrinking or shifting a
/// range within its own old bounds is allowed. Record fees are not adjusted;
/// records keep the fee they were given when the range was created.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingFeeRange] if `fee_range_id` does not refer to a
///   valid fee range,
/// - [Error::InvalidAmountRange] if the bounds are inverted,
/// - [Error::FeeRangeOverlap] if either bound falls inside another range for
///   the wallet,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_fee_range(
    fee_range_id: FeeRangeId,
    form: &FeeRangeForm,
    connection: &Connection,
) -> Result<FeeRange, Error> {
    if form.amount_start > form.amount_end {
        return Err(Error::InvalidAmountRange {
            start: form.amount_start,
            end: form.amount_end,
        });
    }

    let existing = match get_fee_range(fee_range_id, connection) {
        Ok(range) => range,
        Err(Error::NotFound) => return Err(Error::UpdateMissingFeeRange),
        Err(error) => return Err(error),
    };

    let excluded = Some(fee_range_id);

    if is_fee_in_existing_range(existing.wallet_id, form.amount_start, excluded, connection)?
        || is_fee_in_existing_range(existing.wallet_id, form.amount_end, excluded, connection)?
    {
        return Err(Error::FeeRangeOverlap);
    }

    connection.execute(
        "UPDATE fee_range
        SET amount_start = ?1, amount_end = ?2, fee = ?3, date_implemented = ?4
        WHERE id = ?5",
        params![
            form.amount_start,
            form.amount_end,
            form.fee,
            form.date_implemented,
            fee_range_id
        ],
    )?;

    get_fee_range(fee_range_id, connection)
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
        fee::create_endpoint::{FeeRangeForm, create_fee_range},
        initialize_db,
        test_utils::assert_hx_redirect,
        wallet::create_endpoint::{WalletForm, create_wallet},
    };

    use super::{EditFeeRangeState, edit_fee_range_endpoint, update_fee_range};

    fn get_test_state_with_range() -> (EditFeeRangeState, i64) {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        create_wallet(
            &WalletForm {
                name: "Main GCash".to_owned(),
                cell_number: "09171234567".to_owned(),
                wallet_type: "GCash".to_owned(),
                default_rate: 0.02,
            },
            &connection,
        )
        .unwrap();

        let range = create_fee_range(
            1,
            &FeeRangeForm {
                amount_start: 100.0,
                amount_end: 500.0,
                fee: 15.0,
                date_implemented: date!(2025 - 01 - 01),
            },
            &connection,
        )
        .unwrap();

        (
            EditFeeRangeState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            range.id,
        )
    }

    fn get_update_form() -> FeeRangeForm {
        FeeRangeForm {
            amount_start: 150.0,
            amount_end: 450.0,
            fee: 18.0,
            date_implemented: date!(2025 - 03 - 01),
        }
    }

    #[tokio::test]
    async fn redirects_to_fee_ranges_page_on_success() {
        let (state, fee_range_id) = get_test_state_with_range();

        let response =
            edit_fee_range_endpoint(State(state), Path(fee_range_id), Form(get_update_form()))
                .await;

        assert_hx_redirect(&response, &format_endpoint(endpoints::FEE_RANGES_VIEW, 1));
    }

    #[test]
    fn updates_fee_range_fields() {
        let (state, fee_range_id) = get_test_state_with_range();
        let connection = state.db_connection.lock().unwrap();

        let updated = update_fee_range(fee_range_id, &get_update_form(), &connection).unwrap();

        assert_eq!(updated.amount_start, 150.0);
        assert_eq!(updated.amount_end, 450.0);
        assert_eq!(updated.fee, 18.0);
        assert_eq!(updated.date_implemented, date!(2025 - 03 - 01));
    }

    #[test]
    fn own_bounds_do_not_count_as_overlap() {
        let (state, fee_range_id) = get_test_state_with_range();
        let connection = state.db_connection.lock().unwrap();

        // Both new bounds fall inside the range's old bounds.
        let form = FeeRangeForm {
            amount_start: 200.0,
            amount_end: 400.0,
            ..get_update_form()
        };

        assert!(update_fee_range(fee_range_id, &form, &connection).is_ok());
    }

    #[test]
    fn rejects_overlap_with_another_range() {
        let (state, fee_range_id) = get_test_state_with_range();
        let connection = state.db_connection.lock().unwrap();

        create_fee_range(
            1,
            &FeeRangeForm {
                amount_start: 600.0,
                amount_end: 900.0,
                fee: 25.0,
                date_implemented: date!(2025 - 02 - 01),
            },
            &connection,
        )
        .unwrap();

        let form = FeeRangeForm {
            amount_start: 150.0,
            amount_end: 700.0,
            ..get_update_form()
        };

        let result = update_fee_range(fee_range_id, &form, &connection);

        assert_eq!(result, Err(Error::FeeRangeOverlap));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let (state, fee_range_id) = get_test_state_with_range();
        let connection = state.db_connection.lock().unwrap();

        let form = FeeRangeForm {
            amount_start: 450.0,
            amount_end: 150.0,
            ..get_update_form()
        };

        let result = update_fee_range(fee_range_id, &form, &connection);

        assert_eq!(
            result,
            Err(Error::InvalidAmountRange {
                start: 450.0,
                end: 150.0
            })
        );
    }

    #[test]
    fn rejects_missing_range() {
        let (state, _) = get_test_state_with_range();
        let connection = state.db_connection.lock().unwrap();

        let result = update_fee_range(42, &get_update_form(), &connection);

        assert_eq!(result, Err(Error::UpdateMissingFeeRange));
    }
}
