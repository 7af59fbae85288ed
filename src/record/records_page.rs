//! Defines the page listing a wallet's transaction records.

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
        BUTTON_PRIMARY_STYLE, CASH_IN_BADGE_STYLE, CASH_OUT_BADGE_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links,
        format_currency, link,
    },
    internal_server_error::InternalServerError,
    navigation::NavBar,
    not_found::get_404_not_found_response,
    record::core::{Record, TransactionType, get_records_for_wallet},
    wallet::{Wallet, WalletId, get_wallet},
};

/// The state needed for the records page.
#[derive(Debug, Clone)]
pub struct RecordsPageState {
    /// The database connection for accessing wallets and records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecordsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn transaction_type_badge(transaction_type: TransactionType) -> Markup {
    match transaction_type {
        TransactionType::CashIn => html! {
            span class=(CASH_IN_BADGE_STYLE) { "Cash In" }
        },
        TransactionType::CashOut => html! {
            span class=(CASH_OUT_BADGE_STYLE) { "Cash Out" }
        },
    }
}

/// A table row for a record.
///
/// The claim endpoint returns this same fragment so htmx can swap the row in
/// place after a cash-out is claimed.
pub(crate) fn record_row(record: &Record) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_RECORD_VIEW, record.id);
    let delete_url = format_endpoint(endpoints::DELETE_RECORD, record.id);
    let claim_url = format_endpoint(endpoints::CLAIM_RECORD, record.id);

    let status = match (record.transaction_type, record.claimed_at) {
        (TransactionType::CashIn, _) => html! { span { "\u{2014}" } },
        (TransactionType::CashOut, Some(claimed_at)) => html! {
            span title=(claimed_at) { "Claimed" }
        },
        (TransactionType::CashOut, None) => html! {
            button
                hx-post=(claim_url)
                hx-target="closest tr"
                hx-target-error="#alert-container"
                hx-swap="outerHTML"
                class="px-2.5 py-0.5 text-xs font-semibold text-white bg-amber-500 hover:bg-amber-600 rounded-full"
            {
                "Claim"
            }
        },
    };

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (record.date) }

            td class=(TABLE_CELL_STYLE) { (record.reference_number) }

            td class=(TABLE_CELL_STYLE) { (record.cell_number) }

            td class=(TABLE_CELL_STYLE) { (transaction_type_badge(record.transaction_type)) }

            td class=(TABLE_CELL_STYLE) { (format_currency(record.amount)) }

            td class=(TABLE_CELL_STYLE) { (format_currency(record.fee)) }

            td class=(TABLE_CELL_STYLE) { (status) }

            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(notes) = &record.notes { span title=(notes) { "\u{1F4DD}" } }
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-2"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        "Are you sure you want to delete this record?",
                        "closest tr",
                        "delete",
                    ))
                }
            }
        }
    }
}

fn records_view(wallet: &Wallet, records: &[Record]) -> Markup {
    let nav_bar = NavBar::new(endpoints::RECORDS_VIEW).into_html();
    let new_record_url = format_endpoint(endpoints::NEW_RECORD_VIEW, wallet.id);
    let fee_ranges_url = format_endpoint(endpoints::FEE_RANGES_VIEW, wallet.id);

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Records for " (wallet.name) }

            div class="flex gap-4 items-center mb-4"
            {
                a href=(new_record_url) class=(BUTTON_PRIMARY_STYLE) { "New Record" }

                (link(&fee_ranges_url, "Fee Ranges"))
            }

            @if records.is_empty()
            {
                p class="my-4 text-gray-500 dark:text-gray-400"
                { "No records yet. Create one to get started." }
            } @else
            {
                div class="relative overflow-x-auto shadow-md sm:rounded"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Reference #" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Cell Number" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Fee" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for record in records { (record_row(record)) }
                        }
                    }
                }
            }
        }
    );

    base("Records", &[], &content)
}

/// Renders the page listing a wallet's records, newest first.
pub async fn get_records_page(
    State(state): State<RecordsPageState>,
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

    let records = match get_records_for_wallet(wallet_id, &connection) {
        Ok(records) => records,
        Err(error) => {
            tracing::error!("Failed to retrieve records for wallet {wallet_id}: {error}");
            return InternalServerError::default().into_response();
        }
    };

    Html(records_view(&wallet, &records).into_string()).into_response()
}
