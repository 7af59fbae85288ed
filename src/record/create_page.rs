//! Defines the page with the form for creating a transaction record.

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
    fee::fee_field,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        peso_input_styles,
    },
    internal_server_error::InternalServerError,
    navigation::NavBar,
    not_found::get_404_not_found_response,
    timezone::local_date_today,
    wallet::{Wallet, WalletId, get_wallet},
};

/// The state needed for the new record page.
#[derive(Debug, Clone)]
pub struct CreateRecordPageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Manila".
    pub local_timezone: String,
    /// The database connection for checking the wallet exists.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateRecordPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

fn transaction_type_radio(suggest_url: &str) -> Markup {
    let radio = |value: &str, label: &str, checked: bool| {
        html! {
            label class="flex items-center gap-2"
            {
                input
                    type="radio"
                    name="transaction_type"
                    value=(value)
                    checked[checked]
                    hx-get=(suggest_url)
                    hx-trigger="change"
                    hx-target="#fee-field"
                    hx-include="closest form"
                    hx-swap="outerHTML"
                    class=(FORM_RADIO_INPUT_STYLE);

                span class=(FORM_RADIO_LABEL_STYLE) { (label) }
            }
        }
    };

    html! {
        div class=(FORM_RADIO_GROUP_STYLE)
        {
            (radio("cash-in", "Cash In", true))
            (radio("cash-out", "Cash Out", false))
        }
    }
}

fn record_form_fields(suggest_url: &str, default_date: &str) -> Markup {
    html! {
        div
        {
            label for="reference_number" class=(FORM_LABEL_STYLE) { "Reference Number" }

            input
                type="text"
                name="reference_number"
                id="reference_number"
                class=(FORM_TEXT_INPUT_STYLE)
                required;
        }

        div
        {
            label for="cell_number" class=(FORM_LABEL_STYLE) { "Cell Number" }

            input
                type="tel"
                name="cell_number"
                id="cell_number"
                pattern=r"(\+639|09)\d{9}"
                placeholder="09171234567"
                class=(FORM_TEXT_INPUT_STYLE)
                required;
        }

        div
        {
            label class=(FORM_LABEL_STYLE) { "Transaction Type" }

            (transaction_type_radio(suggest_url))
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            div class="input-wrapper w-full"
            {
                input
                    type="number"
                    name="amount"
                    id="amount"
                    min="0.01"
                    step="0.01"
                    hx-get=(suggest_url)
                    hx-trigger="change"
                    hx-target="#fee-field"
                    hx-include="closest form"
                    hx-swap="outerHTML"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }
        }

        div
        {
            label for="fee" class=(FORM_LABEL_STYLE) { "Fee" }

            (fee_field(None))
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                type="date"
                name="date"
                id="date"
                value=(default_date)
                class=(FORM_TEXT_INPUT_STYLE)
                required;
        }

        div
        {
            label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

            textarea
                name="notes"
                id="notes"
                rows="2"
                class=(FORM_TEXT_INPUT_STYLE)
            {}
        }
    }
}

fn new_record_form_view(wallet: &Wallet, default_date: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::RECORDS_VIEW).into_html();
    let create_url = format_endpoint(endpoints::POST_RECORD, wallet.id);
    let suggest_url = format_endpoint(endpoints::SUGGEST_FEE, wallet.id);

    let content = html!(
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "New Record for " (wallet.name) }

            form
                hx-post=(create_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (record_form_fields(&suggest_url, default_date))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Record" }
            }
        }
    );

    base("New Record", &[peso_input_styles()], &content)
}

/// Renders the page with the form for creating a record under a wallet.
pub async fn get_create_record_page(
    State(state): State<CreateRecordPageState>,
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

    let default_date = local_date_today(&state.local_timezone).to_string();

    Html(new_record_form_view(&wallet, &default_date).into_string()).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        endpoints::format_endpoint,
        initialize_db,
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_status_ok, assert_valid_html,
            must_get_form, parse_html_document,
        },
        wallet::create_endpoint::{WalletForm, create_wallet},
    };

    use super::{CreateRecordPageState, get_create_record_page};

    fn get_test_state() -> (CreateRecordPageState, i64) {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        let wallet = create_wallet(
            &WalletForm {
                name: "Main GCash".to_owned(),
                cell_number: "09171234567".to_owned(),
                wallet_type: "GCash".to_owned(),
                default_rate: 0.02,
            },
            &connection,
        )
        .unwrap();

        (
            CreateRecordPageState {
                local_timezone: "Asia/Manila".to_owned(),
                db_connection: Arc::new(Mutex::new(connection)),
            },
            wallet.id,
        )
    }

    #[tokio::test]
    async fn renders_form_with_fee_suggestion_wiring() {
        let (state, wallet_id) = get_test_state();

        let response = get_create_record_page(State(state), Path(wallet_id)).await;

        assert_status_ok(&response);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(
            &form,
            &format_endpoint(crate::endpoints::POST_RECORD, wallet_id),
            "hx-post",
        );
        assert_form_input(&form, "reference_number", "text");
        assert_form_input(&form, "cell_number", "tel");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "fee", "number");
        assert_form_input(&form, "date", "date");

        let form_html = form.html();
        assert!(
            form_html.contains(&format_endpoint(crate::endpoints::SUGGEST_FEE, wallet_id)),
            "want amount input wired to the fee suggestion endpoint"
        );
    }

    #[tokio::test]
    async fn returns_not_found_for_missing_wallet() {
        let (state, _) = get_test_state();

        let response = get_create_record_page(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
