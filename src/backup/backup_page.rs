//! Defines the page for downloading and restoring record backups.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        loading_spinner,
    },
    internal_server_error::InternalServerError,
    navigation::NavBar,
    wallet::{Wallet, get_all_wallets},
};

/// The state needed for the backup page.
#[derive(Debug, Clone)]
pub struct BackupPageState {
    /// The database connection for listing wallets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BackupPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn restore_form_view(wallets: &[Wallet]) -> Markup {
    html! {
        form
            hx-post=(endpoints::RESTORE)
            hx-encoding="multipart/form-data"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="wallet_id" class=(FORM_LABEL_STYLE) { "Restore Into" }

                select name="wallet_id" id="wallet_id" class=(FORM_TEXT_INPUT_STYLE) required
                {
                    @for wallet in wallets
                    {
                        option value=(wallet.id) { (wallet.name) }
                    }
                }
            }

            div
            {
                label for="backup_file" class=(FORM_LABEL_STYLE) { "Backup File" }

                input
                    type="file"
                    name="backup_file"
                    id="backup_file"
                    accept="application/json"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            button type="submit" id="indicator" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="htmx-indicator" { (loading_spinner()) }
                "Restore Backup"
            }
        }
    }
}

fn backup_view(wallets: &[Wallet]) -> Markup {
    let nav_bar = NavBar::new(endpoints::BACKUP_VIEW).into_html();

    let table_row = |wallet: &Wallet| {
        let download_url = format_endpoint(endpoints::BACKUP, wallet.id);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (wallet.name) }

                td class=(TABLE_CELL_STYLE)
                {
                    a href=(download_url) download class=(LINK_STYLE) { "Download" }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Backup" }

            @if wallets.is_empty()
            {
                p class="my-4 text-gray-500 dark:text-gray-400"
                { "No wallets to back up yet." }
            } @else
            {
                div class="relative overflow-x-auto shadow-md sm:rounded mb-8"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Wallet" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Backup" }
                            }
                        }

                        tbody
                        {
                            @for wallet in wallets { (table_row(wallet)) }
                        }
                    }
                }

                h2 class="text-lg font-bold my-4" { "Restore" }

                p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
                {
                    "Restoring a backup adds missing records and refreshes the fee, "
                    "claimed status and notes of records that already exist."
                }

                div class="w-full max-w-md" { (restore_form_view(wallets)) }
            }
        }
    );

    base("Backup", &[], &content)
}

/// Renders the page for downloading per-wallet backups and restoring one.
pub async fn get_backup_page(State(state): State<BackupPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return InternalServerError::default().into_response();
        }
    };

    match get_all_wallets(&connection) {
        Ok(wallets) => Html(backup_view(&wallets).into_string()).into_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve wallets: {error}");
            InternalServerError::default().into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        endpoints::format_endpoint,
        initialize_db,
        test_utils::{
            assert_hx_endpoint, assert_status_ok, assert_valid_html, must_get_form,
            parse_html_document,
        },
        wallet::create_endpoint::{WalletForm, create_wallet},
    };

    use super::{BackupPageState, get_backup_page};

    fn get_test_state() -> BackupPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        BackupPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn renders_empty_state() {
        let state = get_test_state();

        let response = get_backup_page(State(state)).await;

        assert_status_ok(&response);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        assert!(
            document
                .root_element()
                .html()
                .contains("No wallets to back up yet")
        );
    }

    #[tokio::test]
    async fn renders_download_links_and_restore_form() {
        let state = get_test_state();
        let wallet_id = {
            let connection = state.db_connection.lock().unwrap();
            create_wallet(
                &WalletForm {
                    name: "Main GCash".to_owned(),
                    cell_number: "09171234567".to_owned(),
                    wallet_type: "GCash".to_owned(),
                    default_rate: 0.02,
                },
                &connection,
            )
            .unwrap()
            .id
        };

        let response = get_backup_page(State(state)).await;

        assert_status_ok(&response);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let download_selector = Selector::parse(&format!(
            "a[href=\"{}\"]",
            format_endpoint(crate::endpoints::BACKUP, wallet_id)
        ))
        .unwrap();
        assert!(
            document.select(&download_selector).next().is_some(),
            "want a download link for the wallet, got none"
        );

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, crate::endpoints::RESTORE, "hx-post");
        assert_eq!(
            form.value().attr("hx-encoding"),
            Some("multipart/form-data")
        );
    }
}
