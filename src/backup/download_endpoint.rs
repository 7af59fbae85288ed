//! Defines the endpoint for downloading a wallet's records as a JSON file.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    backup::model::BackupRecord,
    record::get_records_for_wallet,
    timezone::local_date_today,
    wallet::{WalletId, get_wallet},
};

/// The state needed to produce a backup file.
#[derive(Debug, Clone)]
pub struct DownloadBackupState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Manila".
    pub local_timezone: String,
    /// The database connection for accessing wallets and records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DownloadBackupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that serves a wallet's records as a JSON attachment.
///
/// The file name embeds the wallet's slug and today's date so backups from
/// different wallets and days do not clobber each other.
pub async fn download_backup_endpoint(
    State(state): State<DownloadBackupState>,
    Path(wallet_id): Path<WalletId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let wallet = match get_wallet(wallet_id, &connection) {
        Ok(wallet) => wallet,
        Err(error) => return error.into_alert_response(),
    };

    let records = match get_records_for_wallet(wallet_id, &connection) {
        Ok(records) => records,
        Err(error) => return error.into_alert_response(),
    };

    let backup_records: Vec<BackupRecord> =
        records.into_iter().map(BackupRecord::from).collect();

    let json = match serde_json::to_string_pretty(&backup_records) {
        Ok(json) => json,
        Err(error) => {
            return Error::JsonSerializationError(error.to_string()).into_alert_response();
        }
    };

    let file_name = format!(
        "records_wallet_{}_backup_{}.json",
        wallet.slug,
        local_date_today(&state.local_timezone)
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        json,
    )
        .into_response()
}
