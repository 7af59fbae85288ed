use std::fmt::Display;

use rusqlite::{
    Connection,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, wallet::WalletId};

pub type RecordId = i64;

/// The direction of money through the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money loaded into the recipient's e-wallet.
    #[serde(rename = "cash-in")]
    CashIn,
    /// Money handed out to the recipient in cash.
    #[serde(rename = "cash-out")]
    CashOut,
}

impl TransactionType {
    /// The string stored in the database and used in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::CashIn => "cash-in",
            TransactionType::CashOut => "cash-out",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "cash-in" => Ok(TransactionType::CashIn),
            "cash-out" => Ok(TransactionType::CashOut),
            other => Err(FromSqlError::Other(
                format!("invalid transaction type {other:?}").into(),
            )),
        }
    }
}

/// A single cash-in or cash-out transaction under a wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The id for the record.
    pub id: RecordId,
    /// The wallet the record belongs to.
    pub wallet_id: WalletId,
    /// The provider's reference number for the transaction.
    pub reference_number: String,
    /// The counterparty's cell number.
    pub cell_number: String,
    /// The transaction amount.
    pub amount: f64,
    /// The fee charged.
    pub fee: f64,
    /// Whether the money came in or went out.
    pub transaction_type: TransactionType,
    /// The date the transaction happened.
    pub date: Date,
    /// When a cash-out was picked up. Always [None] for cash-in records.
    pub claimed_at: Option<OffsetDateTime>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the record was entered.
    pub created_at: OffsetDateTime,
}

pub fn create_record_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS record (
            id INTEGER PRIMARY KEY,
            wallet_id INTEGER NOT NULL,
            reference_number TEXT NOT NULL,
            cell_number TEXT NOT NULL,
            amount REAL NOT NULL,
            fee REAL NOT NULL,
            type TEXT NOT NULL,
            date TEXT NOT NULL,
            claimed_at TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY(wallet_id) REFERENCES wallet(id) ON UPDATE CASCADE ON DELETE CASCADE,
            UNIQUE(wallet_id, reference_number)
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_record(row: &rusqlite::Row) -> Result<Record, rusqlite::Error> {
    let id = row.get(0)?;
    let wallet_id = row.get(1)?;
    let reference_number = row.get(2)?;
    let cell_number = row.get(3)?;
    let amount = row.get(4)?;
    let fee = row.get(5)?;
    let transaction_type = row.get(6)?;
    let date = row.get(7)?;
    let claimed_at = row.get(8)?;
    let notes = row.get(9)?;
    let created_at = row.get(10)?;

    Ok(Record {
        id,
        wallet_id,
        reference_number,
        cell_number,
        amount,
        fee,
        transaction_type,
        date,
        claimed_at,
        notes,
        created_at,
    })
}

const RECORD_COLUMNS: &str =
    "id, wallet_id, reference_number, cell_number, amount, fee, type, date, claimed_at, notes, created_at";

/// Retrieve a record from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid record,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_record(id: RecordId, connection: &Connection) -> Result<Record, Error> {
    let record = connection
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM record WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_row_to_record)?;

    Ok(record)
}

/// Retrieve a wallet's records, newest first.
pub fn get_records_for_wallet(
    wallet_id: WalletId,
    connection: &Connection,
) -> Result<Vec<Record>, Error> {
    connection
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM record
            WHERE wallet_id = :wallet_id
            ORDER BY date DESC, id DESC"
        ))?
        .query_map(&[(":wallet_id", &wallet_id)], map_row_to_record)?
        .map(|maybe_record| maybe_record.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_record_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_record_table(&connection));
    }
}


#[cfg(test)]
mod record_query_tests {
    use rusqlite::Connection;

    use crate::{Error, initialize_db};

    use super::{get_record, get_records_for_wallet};

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

    fn insert_record(conn: &Connection, reference_number: &str, date: &str) {
        conn.execute(
            "INSERT INTO record
            (wallet_id, reference_number, cell_number, amount, fee, type, date, created_at)
            VALUES (1, ?1, '09179876543', 500.0, 10.0, 'cash-in', ?2, '2025-01-02 10:00:00+00:00')",
            (reference_number, date),
        )
        .unwrap();
    }

    #[test]
    fn returns_records_newest_first() {
        let conn = get_test_connection();
        insert_record(&conn, "REF-1", "2025-01-01");
        insert_record(&conn, "REF-2", "2025-03-01");
        insert_record(&conn, "REF-3", "2025-02-01");

        let records = get_records_for_wallet(1, &conn).unwrap();

        let reference_numbers: Vec<&str> = records
            .iter()
            .map(|record| record.reference_number.as_str())
            .collect();
        assert_eq!(reference_numbers, vec!["REF-2", "REF-3", "REF-1"]);
    }

    #[test]
    fn returns_not_found_for_missing_record() {
        let conn = get_test_connection();

        assert_eq!(get_record(42, &conn), Err(Error::NotFound));
    }
}
