//! Defines the endpoint for restoring a JSON backup into a wallet.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, Multipart, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    backup::model::BackupRecord,
    record::TransactionType,
    wallet::{WalletId, get_wallet},
};

/// The state needed to restore a backup.
#[derive(Debug, Clone)]
pub struct RestoreBackupState {
    /// The database connection for reconciling records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RestoreBackupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// How a restore changed the wallet's records.
#[derive(Debug, PartialEq, Eq)]
pub struct RestoreSummary {
    /// The number of records that did not exist before the restore.
    pub inserted: usize,
    /// The number of existing records whose fee, claimed timestamp or notes
    /// were refreshed from the backup.
    pub refreshed: usize,
}

/// A route handler that reconciles an uploaded JSON backup into a wallet.
///
/// Expects a multipart form with a `wallet_id` field and a `backup_file`
/// field holding the JSON file. Responds with an alert summarising how many
/// records were added and how many were refreshed.
pub async fn restore_backup_endpoint(
    State(state): State<RestoreBackupState>,
    mut multipart: Multipart,
) -> Response {
    let mut wallet_id: Option<WalletId> = None;
    let mut file_contents: Option<Vec<u8>> = None;
    let mut file_is_json = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(error) => {
                return Error::MultipartError(error.to_string()).into_alert_response();
            }
        };

        match field.name() {
            Some("wallet_id") => match field.text().await {
                Ok(text) => wallet_id = text.trim().parse().ok(),
                Err(error) => {
                    return Error::MultipartError(error.to_string()).into_alert_response();
                }
            },
            Some("backup_file") => {
                file_is_json = field.content_type() == Some("application/json")
                    || field
                        .file_name()
                        .is_some_and(|file_name| file_name.ends_with(".json"));

                match field.bytes().await {
                    Ok(bytes) => file_contents = Some(bytes.to_vec()),
                    Err(error) => {
                        return Error::MultipartError(error.to_string()).into_alert_response();
                    }
                }
            }
            _ => {}
        }
    }

    let Some(wallet_id) = wallet_id else {
        return Error::MultipartError("missing wallet_id field".to_owned()).into_alert_response();
    };

    let Some(file_contents) = file_contents else {
        return Error::MultipartError("missing backup_file field".to_owned()).into_alert_response();
    };

    if !file_is_json {
        return Error::NotJson.into_alert_response();
    }

    let backup_records: Vec<BackupRecord> = match serde_json::from_slice(&file_contents) {
        Ok(records) => records,
        Err(error) => {
            return Error::InvalidBackup(error.to_string()).into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match restore_records(wallet_id, &backup_records, &connection) {
        Ok(summary) => Alert::Success {
            message: "Backup restored".to_owned(),
            details: format!(
                "{} records added, {} records refreshed",
                summary.inserted, summary.refreshed
            ),
        }
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn validate_backup_records(backup_records: &[BackupRecord]) -> Result<(), Error> {
    for record in backup_records {
        if record.amount <= 0.0 {
            return Err(Error::InvalidBackup(format!(
                "record {} has a non-positive amount",
                record.reference_number
            )));
        }

        if record.fee < 0.0 {
            return Err(Error::InvalidBackup(format!(
                "record {} has a negative fee",
                record.reference_number
            )));
        }
    }

    Ok(())
}

/// Reconcile `backup_records` into the wallet's records.
///
/// Records whose reference number is new to the wallet are inserted. Records
/// that already exist keep their identity but take the backup's fee, claimed
/// timestamp and notes. Applied in a single transaction so a bad backup
/// leaves the wallet untouched.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `wallet_id` does not refer to a valid wallet,
/// - [Error::InvalidBackup] if any record has a non-positive amount or a
///   negative fee,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn restore_records(
    wallet_id: WalletId,
    backup_records: &[BackupRecord],
    connection: &Connection,
) -> Result<RestoreSummary, Error> {
    get_wallet(wallet_id, connection)?;
    validate_backup_records(backup_records)?;

    // Grows as the loop runs so a reference number appearing twice in one
    // backup is only counted as inserted once.
    let mut known_reference_numbers: HashSet<String> = connection
        .prepare("SELECT reference_number FROM record WHERE wallet_id = :wallet_id")?
        .query_map(&[(":wallet_id", &wallet_id)], |row| row.get(0))?
        .collect::<Result<_, _>>()?;

    let transaction = connection.unchecked_transaction()?;

    let mut inserted = 0;
    let mut refreshed = 0;

    for record in backup_records {
        // Cash-in records never carry a claimed timestamp, whatever the
        // backup says.
        let claimed_at = match record.transaction_type {
            TransactionType::CashIn => None,
            TransactionType::CashOut => record.claimed_at,
        };

        transaction.execute(
            "INSERT INTO record
            (wallet_id, reference_number, cell_number, amount, fee, type, date, claimed_at, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(wallet_id, reference_number) DO UPDATE SET
                fee = excluded.fee,
                claimed_at = excluded.claimed_at,
                notes = excluded.notes",
            (
                wallet_id,
                &record.reference_number,
                &record.cell_number,
                record.amount,
                record.fee,
                record.transaction_type,
                record.date,
                claimed_at,
                &record.notes,
                record.created_at,
            ),
        )?;

        if known_reference_numbers.insert(record.reference_number.clone()) {
            inserted += 1;
        } else {
            refreshed += 1;
        }
    }

    transaction.commit()?;

    Ok(RestoreSummary {
        inserted,
        refreshed,
    })
}
