//! Defines the endpoint for updating an existing wallet.

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
    AppState, Error, endpoints,
    wallet::{
        core::{WalletId, slugify},
        create_endpoint::{WalletForm, validate_wallet_form},
    },
};

/// The state needed to update a wallet.
#[derive(Debug, Clone)]
pub struct EditWalletState {
    /// The database connection for managing wallets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditWalletState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a wallet, redirects to the wallets view on
/// success.
pub async fn edit_wallet_endpoint(
    State(state): State<EditWalletState>,
    Path(wallet_id): Path<WalletId>,
    Form(form): Form<WalletForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_wallet(wallet_id, &form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::WALLETS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Update the wallet `id` with the values in `form`.
///
/// The slug is re-derived from the new name so download links stay readable.
fn update_wallet(id: WalletId, form: &WalletForm, connection: &Connection) -> Result<(), Error> {
    validate_wallet_form(form)?;

    let name = form.name.trim();
    let slug = slugify(name);

    let rows_affected = connection
        .execute(
            "UPDATE wallet
            SET name = ?1, slug = ?2, cell_number = ?3, wallet_type = ?4, default_rate = ?5
            WHERE id = ?6",
            params![
                name,
                slug,
                form.cell_number,
                form.wallet_type,
                form.default_rate,
                id
            ],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 2067 =>
            {
                Error::DuplicateWalletName(name.to_owned())
            }
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingWallet);
    }

    Ok(())
}
