//! JSON backup and restore for a wallet's transaction records.

mod backup_page;
mod download_endpoint;
mod model;
mod restore_endpoint;

pub use backup_page::get_backup_page;
pub use download_endpoint::download_backup_endpoint;
pub use model::BackupRecord;
pub use restore_endpoint::restore_backup_endpoint;
