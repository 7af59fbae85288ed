//! Defines the page that lists all wallets.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links,
    },
    internal_server_error::InternalServerError,
    navigation::NavBar,
    wallet::core::{Wallet, map_row_to_wallet},
};

/// The state needed for the wallets page.
#[derive(Debug, Clone)]
pub struct WalletsPageState {
    /// The database connection for accessing wallets and records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for WalletsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A wallet plus the per-wallet counts shown in the table.
struct WalletTableRow {
    wallet: Wallet,
    record_count: i64,
    unclaimed_count: i64,
}

fn wallets_view(rows: &[WalletTableRow]) -> Markup {
    let nav_bar = NavBar::new(endpoints::WALLETS_VIEW).into_html();

    let table_row = |row: &WalletTableRow| {
        let records_url = format_endpoint(endpoints::RECORDS_VIEW, row.wallet.id);
        let fees_url = format_endpoint(endpoints::FEE_RANGES_VIEW, row.wallet.id);
        let action_links = edit_delete_action_links(
            &format_endpoint(endpoints::EDIT_WALLET_VIEW, row.wallet.id),
            &format_endpoint(endpoints::DELETE_WALLET, row.wallet.id),
            &format!(
                "Are you sure you want to delete the wallet '{}'? \
                This deletes all of its records and fee ranges and cannot be undone.",
                row.wallet.name
            ),
            "closest tr",
            "delete",
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    div class="font-medium" { (row.wallet.name) }
                    div class="text-xs text-gray-500 dark:text-gray-400"
                    { (row.wallet.wallet_type) " \u{00b7} " (row.wallet.cell_number) }
                }

                td class=(TABLE_CELL_STYLE) { (row.record_count) }

                td class=(TABLE_CELL_STYLE)
                {
                    @if row.unclaimed_count > 0
                    {
                        span class="font-semibold text-amber-600 dark:text-amber-400"
                        { (row.unclaimed_count) }
                    } @else
                    {
                        "0"
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex items-center gap-4"
                    {
                        a href=(records_url) class=(LINK_STYLE) { "Records" }
                        a href=(fees_url) class=(LINK_STYLE) { "Fees" }
                        (action_links)
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Wallets" }

            p class="my-2"
            {
                a href=(endpoints::NEW_WALLET_VIEW) class=(LINK_STYLE) { "Create wallet" }
            }

            @if rows.is_empty()
            {
                p class="my-4 text-gray-500 dark:text-gray-400"
                { "No wallets yet. Create one to start tracking records." }
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Wallet" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Records" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Unclaimed" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows { (table_row(row)) }
                        }
                    }
                }
            }
        }
    );

    base("Wallets", &[], &content)
}

/// Renders the page listing all wallets with their record counts.
pub async fn get_wallets_page(State(state): State<WalletsPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return InternalServerError::default().into_response();
        }
    };

    let rows = match get_wallet_table_rows(&connection) {
        Ok(rows) => rows,
        Err(error) => {
            tracing::error!("Failed to retrieve wallets: {error}");
            return InternalServerError::default().into_response();
        }
    };

    Html(wallets_view(&rows).into_string()).into_response()
}

fn get_wallet_table_rows(connection: &Connection) -> Result<Vec<WalletTableRow>, Error> {
    connection
        .prepare(
            "SELECT w.id, w.name, w.slug, w.cell_number, w.wallet_type, w.default_rate,
                COUNT(r.id),
                COALESCE(SUM(CASE
                    WHEN r.type = 'cash-out' AND r.claimed_at IS NULL THEN 1
                    ELSE 0
                END), 0)
            FROM wallet w
            LEFT JOIN record r ON r.wallet_id = w.id
            GROUP BY w.id
            ORDER BY w.name ASC",
        )?
        .query_map([], |row| {
            let wallet = map_row_to_wallet(row)?;
            let record_count = row.get(6)?;
            let unclaimed_count = row.get(7)?;

            Ok(WalletTableRow {
                wallet,
                record_count,
                unclaimed_count,
            })
        })?
        .map(|maybe_row| maybe_row.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        initialize_db,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
        wallet::create_endpoint::{WalletForm, create_wallet},
    };

    use super::{WalletsPageState, get_wallets_page};

    fn get_test_state() -> WalletsPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        WalletsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn renders_empty_state() {
        let state = get_test_state();

        let response = get_wallets_page(State(state)).await;

        assert_status_ok(&response);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        assert!(document.root_element().html().contains("No wallets yet"));
    }

    #[tokio::test]
    async fn lists_wallets_with_record_counts() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
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
            connection
                .execute(
                    "INSERT INTO record
                    (wallet_id, reference_number, cell_number, amount, fee, type, date, created_at)
                    VALUES (?1, 'REF-1', '09179876543', 500.0, 10.0, 'cash-out', '2025-01-02',
                    '2025-01-02T10:00:00Z')",
                    [wallet.id],
                )
                .unwrap();
        }

        let response = get_wallets_page(State(state)).await;

        assert_status_ok(&response);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let rows: Vec<_> = document
            .select(&Selector::parse("tbody tr").unwrap())
            .collect();
        assert_eq!(rows.len(), 1);

        let row_text = rows[0].text().collect::<Vec<_>>().join(" ");
        assert!(row_text.contains("Main GCash"));
    }
}
