//! Defines the endpoint for deleting a wallet.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, wallet::core::WalletId};

/// The state needed to delete a wallet.
#[derive(Debug, Clone)]
pub struct DeleteWalletState {
    /// The database connection for managing wallets.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteWalletState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a wallet, responds with an alert.
///
/// Deleting a wallet also deletes its records and fee ranges via the foreign
/// key cascade.
pub async fn delete_wallet_endpoint(
    State(state): State<DeleteWalletState>,
    Path(wallet_id): Path<WalletId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_wallet(wallet_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(rows_affected) if rows_affected != 0 => Alert::SuccessSimple {
            message: "Wallet deleted successfully".to_owned(),
        }
        .into_response(),
        Ok(_) => Error::DeleteMissingWallet.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete wallet {wallet_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn delete_wallet(id: WalletId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM wallet WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}
