//! Retroactive fee adjustment when a wallet's fee ranges change.
//!
//! A record whose fee still matches what the calculator would suggest is
//! considered automatic and follows the range change. A record with any other
//! fee was set by hand (a discount, say) and is left alone.

use rusqlite::Connection;

use crate::{
    Error,
    fee::{core::FeeRange, suggestion::suggest_fee_ignoring_range},
    record::{TransactionType, get_records_for_wallet},
};

type AdjustedCount = usize;

/// Re-fee the wallet's records whose amount falls inside `range`.
///
/// With `revert` false the range was just created: records carrying the fee
/// the calculator suggested without the range take the range's fee. With
/// `revert` true the range is about to be deleted: records carrying the
/// range's fee go back to the fee the calculator suggests without it.
pub(crate) fn adjust_record_fees(
    range: &FeeRange,
    revert: bool,
    connection: &Connection,
) -> Result<AdjustedCount, Error> {
    let records = get_records_for_wallet(range.wallet_id, connection)?;

    let mut adjusted = 0;

    for record in records {
        // Cash-out amounts include the fee, so test membership the way the
        // calculator does.
        let modified_amount = match record.transaction_type {
            TransactionType::CashIn => record.amount,
            TransactionType::CashOut => record.amount - range.fee,
        };

        if modified_amount < range.amount_start || modified_amount > range.amount_end {
            continue;
        }

        let fee_without_range = suggest_fee_ignoring_range(
            record.amount,
            record.transaction_type,
            range.wallet_id,
            Some(range.id),
            connection,
        );

        let new_fee = if revert {
            if record.fee != range.fee {
                continue;
            }
            fee_without_range
        } else {
            if record.fee != fee_without_range {
                continue;
            }
            range.fee
        };

        connection.execute(
            "UPDATE record SET fee = ?1 WHERE id = ?2",
            (new_fee, record.id),
        )?;
        adjusted += 1;
    }

    Ok(adjusted)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        fee::core::FeeRange,
        initialize_db,
        record::{
            TransactionType, get_record,
            create_endpoint::{RecordForm, create_record},
        },
        wallet::create_endpoint::{WalletForm, create_wallet},
    };

    use super::adjust_record_fees;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();
        create_wallet(
            &WalletForm {
                name: "Main GCash".to_owned(),
                cell_number: "09171234567".to_owned(),
                wallet_type: "GCash".to_owned(),
                default_rate: 0.02,
            },
            &conn,
        )
        .unwrap();
        conn
    }

    fn insert_record(conn: &Connection, reference_number: &str, amount: f64, fee: &str) -> i64 {
        create_record(
            1,
            &RecordForm {
                reference_number: reference_number.to_owned(),
                cell_number: "09179876543".to_owned(),
                amount,
                fee: fee.to_owned(),
                transaction_type: TransactionType::CashIn,
                date: date!(2025 - 06 - 15),
                notes: String::new(),
            },
            "Asia/Manila",
            conn,
        )
        .unwrap()
        .id
    }

    // A range that has not been stored yet, as seen mid-create.
    fn pending_range(fee: f64) -> FeeRange {
        FeeRange {
            id: 1,
            wallet_id: 1,
            amount_start: 100.0,
            amount_end: 500.0,
            fee,
            date_implemented: date!(2025 - 01 - 01),
        }
    }

    #[test]
    fn moves_automatic_fees_onto_the_new_range() {
        let conn = get_test_connection();
        // Ladder fee for 300 at the 2% rate is 10.
        let record_id = insert_record(&conn, "REF-100", 300.0, "");

        let adjusted = adjust_record_fees(&pending_range(15.0), false, &conn).unwrap();

        assert_eq!(adjusted, 1);
        assert_eq!(get_record(record_id, &conn).unwrap().fee, 15.0);
    }

    #[test]
    fn leaves_hand_set_fees_alone() {
        let conn = get_test_connection();
        // 12 is neither the ladder fee nor the range fee.
        let record_id = insert_record(&conn, "REF-100", 300.0, "12");

        let adjusted = adjust_record_fees(&pending_range(15.0), false, &conn).unwrap();

        assert_eq!(adjusted, 0);
        assert_eq!(get_record(record_id, &conn).unwrap().fee, 12.0);
    }

    #[test]
    fn skips_records_outside_the_range() {
        let conn = get_test_connection();
        let record_id = insert_record(&conn, "REF-100", 1200.0, "");

        let adjusted = adjust_record_fees(&pending_range(15.0), false, &conn).unwrap();

        assert_eq!(adjusted, 0);
        assert_eq!(get_record(record_id, &conn).unwrap().fee, 30.0);
    }

    #[test]
    fn revert_restores_the_calculator_fee() {
        let conn = get_test_connection();
        // The record carries the range's fee, as if created while the range
        // was in effect.
        let record_id = insert_record(&conn, "REF-100", 300.0, "15");

        let adjusted = adjust_record_fees(&pending_range(15.0), true, &conn).unwrap();

        assert_eq!(adjusted, 1);
        assert_eq!(get_record(record_id, &conn).unwrap().fee, 10.0);
    }

    #[test]
    fn revert_leaves_other_fees_alone() {
        let conn = get_test_connection();
        let record_id = insert_record(&conn, "REF-100", 300.0, "12");

        let adjusted = adjust_record_fees(&pending_range(15.0), true, &conn).unwrap();

        assert_eq!(adjusted, 0);
        assert_eq!(get_record(record_id, &conn).unwrap().fee, 12.0);
    }
}
