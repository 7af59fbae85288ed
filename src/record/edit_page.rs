//! Defines the page with the form for editing a transaction record.

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
    record::core::{Record, RecordId, TransactionType, get_record},
};

/// The state needed for the edit record page.
#[derive(Debug, Clone)]
pub struct EditRecordPageState {
    /// The database connection for accessing records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditRecordPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_record_form_view(record: &Record) -> Markup {
    let nav_bar = NavBar::new(endpoints::RECORDS_VIEW).into_html();
    let update_url = format_endpoint(endpoints::PUT_RECORD, record.id);
    let suggest_url = format_endpoint(endpoints::SUGGEST_FEE, record.wallet_id);

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

    let content = html!(
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Edit Record" }

            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label for="reference_number" class=(FORM_LABEL_STYLE) { "Reference Number" }

                    input
                        type="text"
                        name="reference_number"
                        id="reference_number"
                        value=(record.reference_number)
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
                        value=(record.cell_number)
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                div
                {
                    label class=(FORM_LABEL_STYLE) { "Transaction Type" }

                    div class=(FORM_RADIO_GROUP_STYLE)
                    {
                        (radio("cash-in", "Cash In", record.transaction_type == TransactionType::CashIn))
                        (radio("cash-out", "Cash Out", record.transaction_type == TransactionType::CashOut))
                    }
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
                            value=(format!("{:.2}", record.amount))
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

                    (fee_field(Some(record.fee)))
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        type="date"
                        name="date"
                        id="date"
                        value=(record.date)
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
                    {
                        @if let Some(notes) = &record.notes { (notes) }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Record" }
            }
        }
    );

    base("Edit Record", &[peso_input_styles()], &content)
}

/// Renders the page with the form for editing a record.
pub async fn get_edit_record_page(
    State(state): State<EditRecordPageState>,
    Path(record_id): Path<RecordId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return InternalServerError::default().into_response();
        }
    };

    match get_record(record_id, &connection) {
        Ok(record) => Html(edit_record_form_view(&record).into_string()).into_response(),
        Err(Error::NotFound) => get_404_not_found_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve record {record_id}: {error}");
            InternalServerError::default().into_response()
        }
    }
}
