//! Defines the route handler for the page for editing a wallet.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    internal_server_error::InternalServerError,
    navigation::NavBar,
    not_found::get_404_not_found_response,
    wallet::core::{Wallet, WalletId, get_wallet},
};

/// The state needed for the edit wallet page.
#[derive(Debug, Clone)]
pub struct EditWalletPageState {
    /// The database connection for accessing wallets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditWalletPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_wallet_form_view(update_endpoint: &str, wallet: &Wallet) -> Markup {
    html! {
        form
            hx-put=(update_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    type="text"
                    name="name"
                    id="name"
                    value=(wallet.name)
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    autofocus;
            }

            div
            {
                label for="cell_number" class=(FORM_LABEL_STYLE) { "Cell Number" }

                input
                    type="tel"
                    name="cell_number"
                    id="cell_number"
                    value=(wallet.cell_number)
                    pattern=r"(\+639|09)\d{9}"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="wallet_type" class=(FORM_LABEL_STYLE) { "Provider" }

                input
                    type="text"
                    name="wallet_type"
                    id="wallet_type"
                    value=(wallet.wallet_type)
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="default_rate" class=(FORM_LABEL_STYLE) { "Default Fee Rate" }

                input
                    type="number"
                    name="default_rate"
                    id="default_rate"
                    value=(wallet.default_rate)
                    min="0.01"
                    step="0.001"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Wallet" }
        }
    }
}

/// Renders the page for editing a wallet.
pub async fn get_edit_wallet_page(
    State(state): State<EditWalletPageState>,
    Path(wallet_id): Path<WalletId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return InternalServerError::default().into_response();
        }
    };

    let wallet = match get_wallet(wallet_id, &connection) {
        Ok(wallet) => wallet,
        Err(Error::NotFound) => {
            return get_404_not_found_response();
        }
        Err(error) => {
            tracing::error!("Failed to retrieve wallet {wallet_id}: {error}");
            return InternalServerError::default().into_response();
        }
    };

    let nav_bar = NavBar::new(endpoints::EDIT_WALLET_VIEW).into_html();
    let update_endpoint = format_endpoint(endpoints::PUT_WALLET, wallet_id);
    let form = edit_wallet_form_view(&update_endpoint, &wallet);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Edit Wallet" }
            (form)
        }
    };

    Html(base("Edit Wallet", &[], &content).into_string()).into_response()
}
