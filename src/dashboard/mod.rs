//! Dashboard module
//!
//! Provides an overview page with summary cards and charts covering all
//! wallets over the last twelve months.

mod activity;
mod aggregation;
mod cards;
mod charts;
mod handlers;

pub use handlers::get_dashboard_page;
