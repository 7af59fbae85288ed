use rusqlite::{Connection, params};
use time::Date;

use crate::{Error, wallet::WalletId};

pub type FeeRangeId = i64;

/// A user-defined flat fee for amounts within an inclusive range.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeRange {
    /// The id for the fee range.
    pub id: FeeRangeId,
    /// The wallet this range belongs to.
    pub wallet_id: WalletId,
    /// The inclusive lower bound of the range.
    pub amount_start: f64,
    /// The inclusive upper bound of the range.
    pub amount_end: f64,
    /// The flat fee charged for amounts in the range.
    pub fee: f64,
    /// The date the range took effect. Shown for bookkeeping, not used when
    /// matching.
    pub date_implemented: Date,
}

pub fn create_fee_range_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS fee_range (
            id INTEGER PRIMARY KEY,
            wallet_id INTEGER NOT NULL,
            amount_start REAL NOT NULL,
            amount_end REAL NOT NULL,
            fee REAL NOT NULL,
            date_implemented TEXT NOT NULL,
            FOREIGN KEY(wallet_id) REFERENCES wallet(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_fee_range(row: &rusqlite::Row) -> Result<FeeRange, rusqlite::Error> {
    let id = row.get(0)?;
    let wallet_id = row.get(1)?;
    let amount_start = row.get(2)?;
    let amount_end = row.get(3)?;
    let fee = row.get(4)?;
    let date_implemented = row.get(5)?;

    Ok(FeeRange {
        id,
        wallet_id,
        amount_start,
        amount_end,
        fee,
        date_implemented,
    })
}

/// List the fee ranges for a wallet in the order they were created.
///
/// The suggestion calculator walks these in creation order and takes the first
/// match, so this ordering is load-bearing.
pub fn list_fee_ranges(wallet_id: WalletId, connection: &Connection) -> Result<Vec<FeeRange>, Error> {
    connection
        .prepare(
            "SELECT id, wallet_id, amount_start, amount_end, fee, date_implemented
            FROM fee_range WHERE wallet_id = :wallet_id ORDER BY id ASC",
        )?
        .query_map(&[(":wallet_id", &wallet_id)], map_row_to_fee_range)?
        .map(|maybe_range| maybe_range.map_err(Error::from))
        .collect()
}

/// Get the fee range with the given `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a fee range.
pub fn get_fee_range(id: FeeRangeId, connection: &Connection) -> Result<FeeRange, Error> {
    connection
        .query_one(
            "SELECT id, wallet_id, amount_start, amount_end, fee, date_implemented
            FROM fee_range WHERE id = :id",
            &[(":id", &id)],
            map_row_to_fee_range,
        )
        .map_err(Error::from)
}

/// Check whether `amount` falls inside any existing fee range for the wallet.
///
/// Bounds are inclusive. Note this is a point check: callers that want to know
/// whether a candidate range clashes with existing ranges test its endpoints,
/// so a candidate that strictly contains an existing range is not flagged.
///
/// `excluded_range` skips one range, so edits do not clash with the range
/// being edited.
pub fn is_fee_in_existing_range(
    wallet_id: WalletId,
    amount: f64,
    excluded_range: Option<FeeRangeId>,
    connection: &Connection,
) -> Result<bool, Error> {
    let exists: bool = connection.query_one(
        "SELECT EXISTS(
            SELECT 1 FROM fee_range
            WHERE wallet_id = ?1 AND ?2 BETWEEN amount_start AND amount_end
                AND (?3 IS NULL OR id != ?3)
        )",
        params![wallet_id, amount, excluded_range],
        |row| row.get(0),
    )?;

    Ok(exists)
}
