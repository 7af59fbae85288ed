//! The flattened record view the dashboard aggregates over.

use std::ops::RangeInclusive;

use rusqlite::Connection;
use time::Date;

use crate::{Error, record::TransactionType};

/// A record joined with its wallet's name, as used by the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DashboardRecord {
    /// The name of the wallet the record belongs to.
    pub wallet_name: String,
    /// The transaction amount.
    pub amount: f64,
    /// The fee charged.
    pub fee: f64,
    /// Whether the money came in or went out.
    pub transaction_type: TransactionType,
    /// The date the transaction happened.
    pub date: Date,
    /// Whether a cash-out has been picked up.
    pub is_claimed: bool,
}

/// Retrieve all records within `date_range` across every wallet.
pub(super) fn get_dashboard_records_in_date_range(
    date_range: RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<DashboardRecord>, Error> {
    connection
        .prepare(
            "SELECT w.name, r.amount, r.fee, r.type, r.date, r.claimed_at IS NOT NULL
            FROM record r
            INNER JOIN wallet w ON w.id = r.wallet_id
            WHERE r.date BETWEEN :start AND :end
            ORDER BY r.date ASC",
        )?
        .query_map(
            &[
                (":start", date_range.start() as &dyn rusqlite::ToSql),
                (":end", date_range.end() as &dyn rusqlite::ToSql),
            ],
            |row| {
                Ok(DashboardRecord {
                    wallet_name: row.get(0)?,
                    amount: row.get(1)?,
                    fee: row.get(2)?,
                    transaction_type: row.get(3)?,
                    date: row.get(4)?,
                    is_claimed: row.get(5)?,
                })
            },
        )?
        .map(|maybe_record| maybe_record.map_err(Error::from))
        .collect()
}
