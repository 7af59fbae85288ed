//! Transaction records: cash-in and cash-out entries under a wallet.

mod claim_endpoint;
mod core;
pub(crate) mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod records_page;

pub use claim_endpoint::claim_record_endpoint;
pub use core::{
    Record, RecordId, TransactionType, create_record_table, get_record, get_records_for_wallet,
    map_row_to_record,
};
pub use create_endpoint::create_record_endpoint;
pub use create_page::get_create_record_page;
pub use delete_endpoint::delete_record_endpoint;
pub use edit_endpoint::edit_record_endpoint;
pub use edit_page::get_edit_record_page;
pub use records_page::get_records_page;
