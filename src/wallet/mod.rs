//! E-wallet management: the wallet model and its CRUD pages and endpoints.

mod core;
pub(crate) mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod wallets_page;

pub use core::{
    FALLBACK_DEFAULT_RATE, Wallet, WalletId, create_wallet_table, get_all_wallets,
    get_default_rate, get_wallet, is_valid_cell_number, map_row_to_wallet, slugify,
};
pub use create_endpoint::create_wallet_endpoint;
pub use create_page::get_create_wallet_page;
pub use delete_endpoint::delete_wallet_endpoint;
pub use edit_endpoint::edit_wallet_endpoint;
pub use edit_page::get_edit_wallet_page;
pub use wallets_page::get_wallets_page;
