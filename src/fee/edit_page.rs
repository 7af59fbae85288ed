//! Defines the page with the form for editing a fee range.

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
    fee::core::{FeeRange, FeeRangeId, get_fee_range},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        peso_input_styles,
    },
    internal_server_error::InternalServerError,
    navigation::NavBar,
    not_found::get_404_not_found_response,
};

/// The state needed for the edit fee range page.
#[derive(Debug, Clone)]
pub struct EditFeeRangePageState {
    /// The database connection for accessing fee ranges.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditFeeRangePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_fee_range_form_view(range: &FeeRange) -> Markup {
    let nav_bar = NavBar::new(endpoints::FEE_RANGES_VIEW).into_html();
    let update_url = format_endpoint(endpoints::PUT_FEE_RANGE, range.id);

    let content = html!(
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Edit Fee Range" }

            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div class="grid grid-cols-2 gap-4"
                {
                    div
                    {
                        label for="amount_start" class=(FORM_LABEL_STYLE) { "Amount From" }

                        div class="input-wrapper w-full"
                        {
                            input
                                type="number"
                                name="amount_start"
                                id="amount_start"
                                min="0"
                                step="0.01"
                                value=(format!("{:.2}", range.amount_start))
                                class=(FORM_TEXT_INPUT_STYLE)
                                required;
                        }
                    }

                    div
                    {
                        label for="amount_end" class=(FORM_LABEL_STYLE) { "Amount To" }

                        div class="input-wrapper w-full"
                        {
                            input
                                type="number"
                                name="amount_end"
                                id="amount_end"
                                min="0"
                                step="0.01"
                                value=(format!("{:.2}", range.amount_end))
                                class=(FORM_TEXT_INPUT_STYLE)
                                required;
                        }
                    }
                }

                div
                {
                    label for="fee" class=(FORM_LABEL_STYLE) { "Fee" }

                    div class="input-wrapper w-full"
                    {
                        input
                            type="number"
                            name="fee"
                            id="fee"
                            min="0"
                            step="0.01"
                            value=(format!("{:.2}", range.fee))
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }
                }

                div
                {
                    label for="date_implemented" class=(FORM_LABEL_STYLE) { "Date Implemented" }

                    input
                        type="date"
                        name="date_implemented"
                        id="date_implemented"
                        value=(range.date_implemented)
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Fee Range" }
            }
        }
    );

    base("Edit Fee Range", &[peso_input_styles()], &content)
}

/// Renders the page with the form for editing a fee range.
pub async fn get_edit_fee_range_page(
    State(state): State<EditFeeRangePageState>,
    Path(fee_range_id): Path<FeeRangeId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return InternalServerError::default().into_response();
        }
    };

    match get_fee_range(fee_range_id, &connection) {
        Ok(range) => Html(edit_fee_range_form_view(&range).into_string()).into_response(),
        Err(Error::NotFound) => get_404_not_found_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve fee range {fee_range_id}: {error}");
            InternalServerError::default().into_response()
        }
    }
}
