//! Defines the endpoint for creating a fee range.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::{Connection, params};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    fee::{
        adjustment::adjust_record_fees,
        core::{FeeRange, is_fee_in_existing_range},
    },
    wallet::WalletId,
};

/// The state needed to create a fee range.
#[derive(Debug, Clone)]
pub struct CreateFeeRangeState {
    /// The database connection for managing fee ranges.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateFeeRangeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a fee range.
#[derive(Debug, Deserialize)]
pub struct FeeRangeForm {
    /// The inclusive lower bound of the range.
    pub amount_start: f64,
    /// The inclusive upper bound of the range.
    pub amount_end: f64,
    /// The flat fee charged for amounts in the range.
    pub fee: f64,
    /// The date the range took effect.
    pub date_implemented: Date,
}

/// A route handler for creating a fee range, redirects back to the wallet's
/// fee ranges view on success.
pub async fn create_fee_range_endpoint(
    State(state): State<CreateFeeRangeState>,
    Path(wallet_id): Path<WalletId>,
    Form(form): Form<FeeRangeForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_fee_range(wallet_id, &form, &connection) {
        Ok(_) => (
            HxRedirect(format_endpoint(endpoints::FEE_RANGES_VIEW, wallet_id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Create a fee range for `wallet_id`.
///
/// Rejects inverted bounds, and rejects ranges whose start or end falls inside
/// an existing range for the wallet. The check tests only the new range's
/// endpoints, so a range that strictly contains an existing one is accepted;
/// matching order decides which applies.
///
/// Existing records inside the new range whose fee was taken from the
/// suggestion calculator are moved onto the new range's fee. Fees set by hand
/// are left alone.
pub fn create_fee_range(
    wallet_id: WalletId,
    form: &FeeRangeForm,
    connection: &Connection,
) -> Result<FeeRange, Error> {
    if form.amount_start > form.amount_end {
        return Err(Error::InvalidAmountRange {
            start: form.amount_start,
            end: form.amount_end,
        });
    }

    if is_fee_in_existing_range(wallet_id, form.amount_start, None, connection)?
        || is_fee_in_existing_range(wallet_id, form.amount_end, None, connection)?
    {
        return Err(Error::FeeRangeOverlap);
    }

    let transaction = connection.unchecked_transaction()?;

    transaction.execute(
        "INSERT INTO fee_range (wallet_id, amount_start, amount_end, fee, date_implemented)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            wallet_id,
            form.amount_start,
            form.amount_end,
            form.fee,
            form.date_implemented
        ],
    )?;

    let range = FeeRange {
        id: transaction.last_insert_rowid(),
        wallet_id,
        amount_start: form.amount_start,
        amount_end: form.amount_end,
        fee: form.fee,
        date_implemented: form.date_implemented,
    };

    adjust_record_fees(&range, false, &transaction)?;

    transaction.commit()?;

    Ok(range)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        fee::core::list_fee_ranges,
        initialize_db,
        record::{
            TransactionType, get_record,
            create_endpoint::{RecordForm, create_record},
        },
    };

    use super::{FeeRangeForm, create_fee_range};

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

    fn test_form() -> FeeRangeForm {
        FeeRangeForm {
            amount_start: 100.0,
            amount_end: 500.0,
            fee: 15.0,
            date_implemented: date!(2025 - 01 - 01),
        }
    }

    #[test]
    fn creates_fee_range() {
        let conn = get_test_connection();

        let range = create_fee_range(1, &test_form(), &conn).unwrap();

        assert_eq!(range.wallet_id, 1);
        assert_eq!(list_fee_ranges(1, &conn).unwrap(), vec![range]);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let conn = get_test_connection();
        let form = FeeRangeForm {
            amount_start: 500.0,
            amount_end: 100.0,
            ..test_form()
        };

        assert_eq!(
            create_fee_range(1, &form, &conn),
            Err(Error::InvalidAmountRange {
                start: 500.0,
                end: 100.0
            })
        );
    }

    #[test]
    fn rejects_endpoint_inside_existing_range() {
        let conn = get_test_connection();
        create_fee_range(1, &test_form(), &conn).unwrap();

        let overlapping_start = FeeRangeForm {
            amount_start: 400.0,
            amount_end: 900.0,
            ..test_form()
        };
        let overlapping_end = FeeRangeForm {
            amount_start: 50.0,
            amount_end: 200.0,
            ..test_form()
        };

        assert_eq!(
            create_fee_range(1, &overlapping_start, &conn),
            Err(Error::FeeRangeOverlap)
        );
        assert_eq!(
            create_fee_range(1, &overlapping_end, &conn),
            Err(Error::FeeRangeOverlap)
        );
    }

    #[test]
    fn accepts_range_containing_an_existing_range() {
        let conn = get_test_connection();
        create_fee_range(1, &test_form(), &conn).unwrap();

        // Both endpoints lie outside the existing range, so the point check
        // passes even though the new range fully contains it.
        let containing = FeeRangeForm {
            amount_start: 50.0,
            amount_end: 600.0,
            fee: 25.0,
            date_implemented: date!(2025 - 02 - 01),
        };

        assert!(create_fee_range(1, &containing, &conn).is_ok());
        assert_eq!(list_fee_ranges(1, &conn).unwrap().len(), 2);
    }

    fn record_form(reference_number: &str, fee: &str) -> RecordForm {
        RecordForm {
            reference_number: reference_number.to_owned(),
            cell_number: "09179876543".to_owned(),
            amount: 300.0,
            fee: fee.to_owned(),
            transaction_type: TransactionType::CashIn,
            date: date!(2025 - 06 - 15),
            notes: String::new(),
        }
    }

    #[test]
    fn creating_range_adjusts_matching_record_fees() {
        let conn = get_test_connection();
        // A blank fee takes the suggestion, 10 for 300 at the 2% rate.
        let automatic = create_record(1, &record_form("REF-100", ""), "Asia/Manila", &conn).unwrap();
        let manual = create_record(1, &record_form("REF-200", "12"), "Asia/Manila", &conn).unwrap();

        create_fee_range(1, &test_form(), &conn).unwrap();

        assert_eq!(get_record(automatic.id, &conn).unwrap().fee, 15.0);
        assert_eq!(get_record(manual.id, &conn).unwrap().fee, 12.0);
    }

    #[test]
    fn ranges_do_not_clash_across_wallets() {
        let conn = get_test_connection();
        conn.execute(
            "INSERT INTO wallet (id, name, slug, cell_number, wallet_type, default_rate)
            VALUES (2, 'Other', 'other', '09179876543', 'Maya', 0.02)",
            (),
        )
        .unwrap();
        create_fee_range(1, &test_form(), &conn).unwrap();

        assert!(create_fee_range(2, &test_form(), &conn).is_ok());
    }
}
