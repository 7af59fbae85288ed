//! Defines the endpoint that suggests a fee for the record forms.
//!
//! The record forms call this endpoint via htmx whenever the amount or
//! transaction type changes, swapping the returned fragment in place of the
//! fee input.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, fee::suggestion::suggest_fee, html::FORM_TEXT_INPUT_STYLE,
    record::TransactionType, wallet::WalletId,
};

/// The state needed to suggest a fee.
#[derive(Debug, Clone)]
pub struct SuggestFeeState {
    /// The database connection for accessing fee ranges and wallets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SuggestFeeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the fee suggestion endpoint.
///
/// The amount is a string because htmx sends the whole form, including an
/// amount field the user may not have filled in yet.
#[derive(Debug, Deserialize)]
pub struct SuggestFeeParams {
    /// The amount entered so far, possibly blank.
    #[serde(default)]
    pub amount: String,
    /// The selected transaction type.
    pub transaction_type: TransactionType,
}

/// The fee input for the record forms, optionally prefilled with a suggestion.
pub(crate) fn fee_field(fee: Option<f64>) -> Markup {
    html! {
        div id="fee-field" class="input-wrapper w-full"
        {
            input
                type="number"
                name="fee"
                id="fee"
                min="0"
                step="0.01"
                value=[fee.map(|fee| format!("{fee:.2}"))]
                placeholder="Leave blank to auto-suggest"
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// A route handler that returns the fee input prefilled with a suggested fee.
pub async fn suggest_fee_endpoint(
    State(state): State<SuggestFeeState>,
    Path(wallet_id): Path<WalletId>,
    Query(params): Query<SuggestFeeParams>,
) -> Response {
    let Some(amount) = params
        .amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| *amount > 0.0)
    else {
        return Html(fee_field(None).into_string()).into_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let fee = suggest_fee(amount, params.transaction_type, wallet_id, &connection);

    Html(fee_field(Some(fee)).into_string()).into_response()
}
