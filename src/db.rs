//! Database initialization for the application.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    fee::create_fee_range_table, record::create_record_table, wallet::create_wallet_table,
};

/// Create the application's tables in `connection`.
///
/// Enables foreign key enforcement so that deleting a wallet cascades to its
/// records and fee ranges.
///
/// # Errors
/// Returns an error if the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_wallet_table(&transaction)?;
    create_fee_range_table(&transaction)?;
    create_record_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
