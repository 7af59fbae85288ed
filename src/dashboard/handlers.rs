//! Dashboard HTTP handler and view rendering.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use std::{
    ops::RangeInclusive,
    sync::{Arc, Mutex},
};
use time::{Date, Duration};

use crate::{
    AppState, Error,
    dashboard::{
        activity::{DashboardRecord, get_dashboard_records_in_date_range},
        aggregation::calculate_totals,
        cards::summary_cards_view,
        charts::{DashboardChart, charts_script, monthly_fees_chart, wallet_volume_chart},
    },
    endpoints,
    html::{HeadElement, base, link},
    navigation::NavBar,
    timezone::local_date_today,
};

/// Number of days to look back for the dashboard window
const YEARLY_PERIOD_DAYS: i64 = 365;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Manila".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of all wallets.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    let date_range = get_dashboard_date_range(&state.local_timezone);
    let records = get_dashboard_records_in_date_range(date_range, &connection)
        .inspect_err(|error| {
            tracing::error!("Could not get records for the last year: {error}")
        })?;

    if records.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    Ok(dashboard_view(nav_bar, &records).into_response())
}

/// Gets the date range for dashboard queries (last year up to today).
fn get_dashboard_date_range(local_timezone: &str) -> RangeInclusive<Date> {
    let today = local_date_today(local_timezone);
    let one_year_ago = today - Duration::days(YEARLY_PERIOD_DAYS);
    one_year_ago..=today
}

fn build_dashboard_charts(records: &[DashboardRecord]) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "monthly-fees-chart",
            options: monthly_fees_chart(records).to_string(),
        },
        DashboardChart {
            id: "wallet-volume-chart",
            options: wallet_volume_chart(records).to_string(),
        },
    ]
}

/// Renders the dashboard page when no record data exists.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let wallets_link = link(endpoints::WALLETS_VIEW, "a wallet");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Cards and charts will show up here once you record some
                transactions. Start by creating " (wallets_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with summary cards and charts.
fn dashboard_view(nav_bar: NavBar, records: &[DashboardRecord]) -> Markup {
    let nav_bar = nav_bar.into_html();
    let totals = calculate_totals(records);
    let charts = build_dashboard_charts(records);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (summary_cards_view(&totals))

            section
                id="charts"
                class="w-full mx-auto mb-4"
            {
                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    @for chart in &charts {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded dark:bg-gray-100"
                        {}
                    }
                }
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::{Duration, OffsetDateTime};

    use crate::{
        initialize_db,
        record::{
            TransactionType,
            create_endpoint::{RecordForm, create_record},
        },
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
        wallet::create_endpoint::{WalletForm, create_wallet},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_test_state() -> DashboardState {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn create_test_data(conn: &Connection) {
        create_wallet(
            &WalletForm {
                name: "Main GCash".to_owned(),
                cell_number: "09171234567".to_owned(),
                wallet_type: "GCash".to_owned(),
                default_rate: 0.02,
            },
            conn,
        )
        .unwrap();

        let today = OffsetDateTime::now_utc().date();

        create_record(
            1,
            &RecordForm {
                reference_number: "REF-1".to_owned(),
                cell_number: "09179876543".to_owned(),
                amount: 1000.0,
                fee: "20".to_owned(),
                transaction_type: TransactionType::CashIn,
                date: today,
                notes: String::new(),
            },
            "Etc/UTC",
            conn,
        )
        .unwrap();

        create_record(
            1,
            &RecordForm {
                reference_number: "REF-2".to_owned(),
                cell_number: "09179876543".to_owned(),
                amount: 500.0,
                fee: "10".to_owned(),
                transaction_type: TransactionType::CashOut,
                date: today - Duration::days(15),
                notes: String::new(),
            },
            "Etc/UTC",
            conn,
        )
        .unwrap();
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{chart_id}")).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Chart with id '{chart_id}' not found"
        );
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let state = get_test_state();
        create_test_data(&state.db_connection.lock().unwrap());

        let response = get_dashboard_page(State(state)).await.unwrap();

        assert_status_ok(&response);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert_chart_exists(&html, "monthly-fees-chart");
        assert_chart_exists(&html, "wallet-volume-chart");

        let page_html = html.root_element().html();
        assert!(page_html.contains("Cash In"));
        assert!(page_html.contains("Fees Earned"));
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_data() {
        let state = get_test_state();

        let response = get_dashboard_page(State(state)).await.unwrap();

        assert_status_ok(&response);

        let html = parse_html_document(response).await;
        assert!(html.root_element().html().contains("Nothing here yet"));
    }
}
