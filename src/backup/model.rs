//! The JSON wire format for record backups.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::record::{Record, TransactionType};

time::serde::format_description!(backup_date, Date, "[year]-[month]-[day]");

/// A record as it appears in a JSON backup file.
///
/// The field names are camelCase so backups taken before this app existed can
/// be restored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRecord {
    /// The provider's reference number for the transaction.
    pub reference_number: String,
    /// The counterparty's cell number.
    pub cell_number: String,
    /// The transaction amount.
    pub amount: f64,
    /// The fee charged.
    pub fee: f64,
    /// Whether the money came in or went out.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The date the transaction happened.
    #[serde(with = "backup_date")]
    pub date: Date,
    /// When a cash-out was picked up, if it has been.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub claimed_at: Option<OffsetDateTime>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// When the record was entered.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Record> for BackupRecord {
    fn from(record: Record) -> Self {
        Self {
            reference_number: record.reference_number,
            cell_number: record.cell_number,
            amount: record.amount,
            fee: record.fee,
            transaction_type: record.transaction_type,
            date: record.date,
            claimed_at: record.claimed_at,
            notes: record.notes,
            created_at: record.created_at,
        }
    }
}
