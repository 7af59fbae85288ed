//! Defines the endpoint for creating a new wallet.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::{Connection, params};
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    wallet::core::{Wallet, is_valid_cell_number, slugify},
};

/// The smallest default rate the wallet form accepts.
pub const MIN_DEFAULT_RATE: f64 = 0.01;

/// The state needed to create a wallet.
#[derive(Debug, Clone)]
pub struct CreateWalletState {
    /// The database connection for managing wallets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateWalletState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing a wallet.
#[derive(Debug, Deserialize)]
pub struct WalletForm {
    /// The wallet display name.
    pub name: String,
    /// The cell number the wallet is registered to.
    pub cell_number: String,
    /// The e-wallet provider.
    pub wallet_type: String,
    /// The fee rate used by the fee suggestion ladder.
    pub default_rate: f64,
}

/// A route handler for creating a new wallet, redirects to the wallets view on
/// success.
pub async fn create_wallet_endpoint(
    State(state): State<CreateWalletState>,
    Form(form): Form<WalletForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_wallet(&form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::WALLETS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Validate the wallet form fields shared by the create and edit endpoints.
pub fn validate_wallet_form(form: &WalletForm) -> Result<(), Error> {
    if form.name.trim().is_empty() {
        return Err(Error::EmptyWalletName);
    }

    if !is_valid_cell_number(&form.cell_number) {
        return Err(Error::InvalidCellNumber(form.cell_number.clone()));
    }

    if form.default_rate < MIN_DEFAULT_RATE {
        return Err(Error::InvalidDefaultRate(form.default_rate));
    }

    Ok(())
}

pub fn create_wallet(form: &WalletForm, connection: &Connection) -> Result<Wallet, Error> {
    validate_wallet_form(form)?;

    let name = form.name.trim();
    let slug = slugify(name);

    connection
        .execute(
            "INSERT INTO wallet (name, slug, cell_number, wallet_type, default_rate)
            VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                name,
                slug,
                form.cell_number,
                form.wallet_type,
                form.default_rate
            ],
        )
        .map_err(|error| match error {
            // The name and slug columns both carry UNIQUE constraints.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 2067 =>
            {
                Error::DuplicateWalletName(name.to_owned())
            }
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Wallet {
        id,
        name: name.to_owned(),
        slug,
        cell_number: form.cell_number.clone(),
        wallet_type: form.wallet_type.clone(),
        default_rate: form.default_rate,
    })
}
