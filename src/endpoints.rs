//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/wallets/{wallet_id}/edit',
//! use [format_endpoint].

use crate::database_id::DatabaseId;

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page showing overview cards and charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing all e-wallets.
pub const WALLETS_VIEW: &str = "/wallets";
/// The page for creating a new e-wallet.
pub const NEW_WALLET_VIEW: &str = "/wallets/new";
/// The page for editing an existing e-wallet.
pub const EDIT_WALLET_VIEW: &str = "/wallets/{wallet_id}/edit";
/// The page listing a wallet's transaction records.
pub const RECORDS_VIEW: &str = "/wallets/{wallet_id}/records";
/// The page for creating a new record under a wallet.
pub const NEW_RECORD_VIEW: &str = "/wallets/{wallet_id}/records/new";
/// The page for editing an existing record.
pub const EDIT_RECORD_VIEW: &str = "/records/{record_id}/edit";
/// The page for managing a wallet's custom fee ranges.
pub const FEE_RANGES_VIEW: &str = "/wallets/{wallet_id}/fees";
/// The page for editing an existing fee range.
pub const EDIT_FEE_RANGE_VIEW: &str = "/fees/{fee_range_id}/edit";
/// The page for downloading and restoring record backups.
pub const BACKUP_VIEW: &str = "/backup";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create a wallet.
pub const POST_WALLET: &str = "/api/wallets";
/// The route to update a wallet.
pub const PUT_WALLET: &str = "/api/wallets/{wallet_id}";
/// The route to delete a wallet.
pub const DELETE_WALLET: &str = "/api/wallets/{wallet_id}";
/// The route to create a record under a wallet.
pub const POST_RECORD: &str = "/api/wallets/{wallet_id}/records";
/// The route to update a record.
pub const PUT_RECORD: &str = "/api/records/{record_id}";
/// The route to delete a record.
pub const DELETE_RECORD: &str = "/api/records/{record_id}";
/// The route to mark a cash-out record as claimed.
pub const CLAIM_RECORD: &str = "/api/records/{record_id}/claim";
/// The route to create a fee range under a wallet.
pub const POST_FEE_RANGE: &str = "/api/wallets/{wallet_id}/fees";
/// The route to update a fee range.
pub const PUT_FEE_RANGE: &str = "/api/fees/{fee_range_id}";
/// The route to delete a fee range.
pub const DELETE_FEE_RANGE: &str = "/api/fees/{fee_range_id}";
/// The route to get a suggested fee for a wallet, amount and transaction type.
pub const SUGGEST_FEE: &str = "/api/wallets/{wallet_id}/suggest-fee";
/// The route to download a wallet's records as a JSON backup.
pub const BACKUP: &str = "/api/wallets/{wallet_id}/backup";
/// The route to upload a JSON backup and reconcile it into a wallet.
pub const RESTORE: &str = "/api/restore";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string delimited by braces, e.g. '{wallet_id}' in the
/// endpoint path '/wallets/{wallet_id}/edit'. This function assumes that an
/// endpoint path contains at most a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: DatabaseId) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
