//! Application router configuration.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    backup::{download_backup_endpoint, get_backup_page, restore_backup_endpoint},
    dashboard::get_dashboard_page,
    endpoints,
    fee::{
        create_fee_range_endpoint, delete_fee_range_endpoint, edit_fee_range_endpoint,
        get_edit_fee_range_page, get_fee_ranges_page, suggest_fee_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    logging::logging_middleware,
    not_found::get_404_not_found,
    record::{
        claim_record_endpoint, create_record_endpoint, delete_record_endpoint,
        edit_record_endpoint, get_create_record_page, get_edit_record_page, get_records_page,
    },
    wallet::{
        create_wallet_endpoint, delete_wallet_endpoint, edit_wallet_endpoint,
        get_create_wallet_page, get_edit_wallet_page, get_wallets_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::WALLETS_VIEW, get(get_wallets_page))
        .route(endpoints::NEW_WALLET_VIEW, get(get_create_wallet_page))
        .route(endpoints::EDIT_WALLET_VIEW, get(get_edit_wallet_page))
        .route(endpoints::RECORDS_VIEW, get(get_records_page))
        .route(endpoints::NEW_RECORD_VIEW, get(get_create_record_page))
        .route(endpoints::EDIT_RECORD_VIEW, get(get_edit_record_page))
        .route(endpoints::FEE_RANGES_VIEW, get(get_fee_ranges_page))
        .route(endpoints::EDIT_FEE_RANGE_VIEW, get(get_edit_fee_range_page))
        .route(endpoints::BACKUP_VIEW, get(get_backup_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(endpoints::POST_WALLET, post(create_wallet_endpoint))
        .route(endpoints::PUT_WALLET, put(edit_wallet_endpoint))
        .route(endpoints::DELETE_WALLET, delete(delete_wallet_endpoint))
        .route(endpoints::POST_RECORD, post(create_record_endpoint))
        .route(endpoints::PUT_RECORD, put(edit_record_endpoint))
        .route(endpoints::DELETE_RECORD, delete(delete_record_endpoint))
        .route(endpoints::CLAIM_RECORD, post(claim_record_endpoint))
        .route(endpoints::POST_FEE_RANGE, post(create_fee_range_endpoint))
        .route(endpoints::PUT_FEE_RANGE, put(edit_fee_range_endpoint))
        .route(
            endpoints::DELETE_FEE_RANGE,
            delete(delete_fee_range_endpoint),
        )
        .route(endpoints::SUGGEST_FEE, get(suggest_fee_endpoint))
        .route(endpoints::BACKUP, get(download_backup_endpoint))
        .route(endpoints::RESTORE, post(restore_backup_endpoint));

    page_routes
        .merge(api_routes)
        .layer(middleware::from_fn(logging_middleware))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
