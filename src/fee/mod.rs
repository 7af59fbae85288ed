//! Custom fee ranges and the fee suggestion calculator.

mod adjustment;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod ranges_page;
mod suggest_endpoint;
mod suggestion;

pub use core::{
    FeeRange, FeeRangeId, create_fee_range_table, get_fee_range, is_fee_in_existing_range,
    list_fee_ranges, map_row_to_fee_range,
};
pub use create_endpoint::create_fee_range_endpoint;
pub use delete_endpoint::delete_fee_range_endpoint;
pub use edit_endpoint::edit_fee_range_endpoint;
pub use edit_page::get_edit_fee_range_page;
pub use ranges_page::get_fee_ranges_page;
pub use suggest_endpoint::suggest_fee_endpoint;
pub(crate) use suggest_endpoint::fee_field;
pub use suggestion::suggest_fee;
