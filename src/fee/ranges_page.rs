//! Defines the page for managing a wallet's custom fee ranges.

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
    fee::core::{FeeRange, list_fee_ranges},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links,
        format_currency, peso_input_styles,
    },
    internal_server_error::InternalServerError,
    navigation::NavBar,
    not_found::get_404_not_found_response,
    timezone::local_date_today,
    wallet::{Wallet, WalletId, get_wallet},
};

/// The state needed for the fee ranges page.
#[derive(Debug, Clone)]
pub struct FeeRangesPageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Manila".
    pub local_timezone: String,
    /// The database connection for accessing wallets and fee ranges.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for FeeRangesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

fn new_fee_range_form_view(create_endpoint: &str, default_date: &str) -> Markup {
    html! {
        form
            hx-post=(create_endpoint)
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
                    value=(default_date)
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Fee Range" }
        }
    }
}

fn fee_ranges_view(wallet: &Wallet, ranges: &[FeeRange], default_date: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::FEE_RANGES_VIEW).into_html();
    let create_endpoint = format_endpoint(endpoints::POST_FEE_RANGE, wallet.id);
    let form = new_fee_range_form_view(&create_endpoint, default_date);

    let table_row = |range: &FeeRange| {
        let edit_url = format_endpoint(endpoints::EDIT_FEE_RANGE_VIEW, range.id);
        let delete_url = format_endpoint(endpoints::DELETE_FEE_RANGE, range.id);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                { (format_currency(range.amount_start)) " \u{2013} " (format_currency(range.amount_end)) }

                td class=(TABLE_CELL_STYLE) { (format_currency(range.fee)) }

                td class=(TABLE_CELL_STYLE) { (range.date_implemented) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-2"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            "Are you sure you want to delete this fee range?",
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Fee Ranges for " (wallet.name) }

            p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
            {
                "Amounts outside every range fall back to the wallet's default rate of "
                (wallet.default_rate) "."
            }

            div class="w-full max-w-md" { (form) }

            @if ranges.is_empty()
            {
                p class="my-4 text-gray-500 dark:text-gray-400"
                { "No custom fee ranges yet." }
            } @else
            {
                div class="relative overflow-x-auto shadow-md sm:rounded mt-8"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Range" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Fee" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date Implemented" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for range in ranges { (table_row(range)) }
                        }
                    }
                }
            }
        }
    );

    base("Fee Ranges", &[peso_input_styles()], &content)
}

/// Renders the page listing a wallet's fee ranges with a form to add one.
pub async fn get_fee_ranges_page(
    State(state): State<FeeRangesPageState>,
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

    let ranges = match list_fee_ranges(wallet_id, &connection) {
        Ok(ranges) => ranges,
        Err(error) => {
            tracing::error!("Failed to retrieve fee ranges for wallet {wallet_id}: {error}");
            return InternalServerError::default().into_response();
        }
    };

    let default_date = local_date_today(&state.local_timezone).to_string();

    Html(fee_ranges_view(&wallet, &ranges, &default_date).into_string()).into_response()
}
