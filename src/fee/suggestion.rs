//! The fee suggestion calculator.
//!
//! Custom fee ranges are checked first in creation order. When none match, the
//! fee falls back to a ladder over the wallet's default rate: amounts are
//! bucketed into 500 peso bands and charged the band boundary times the rate.

use rusqlite::Connection;

use crate::{
    fee::core::{FeeRange, FeeRangeId, list_fee_ranges},
    record::TransactionType,
    wallet::{WalletId, get_default_rate},
};

/// The width of one fee band in pesos.
const LADDER_WIDTH: f64 = 500.0;

/// Suggest a fee for sending or receiving `amount` through the wallet.
///
/// This function always produces a number: when the wallet has no fee ranges,
/// the ranges cannot be loaded, or the wallet is missing, it degrades to the
/// ladder over the default rate (or the hardcoded fallback rate).
pub fn suggest_fee(
    amount: f64,
    transaction_type: TransactionType,
    wallet_id: WalletId,
    connection: &Connection,
) -> f64 {
    suggest_fee_ignoring_range(amount, transaction_type, wallet_id, None, connection)
}

/// [suggest_fee] with one range left out of the matching.
///
/// Used when a range is being created or deleted to work out what the fee
/// would be without it.
pub(crate) fn suggest_fee_ignoring_range(
    amount: f64,
    transaction_type: TransactionType,
    wallet_id: WalletId,
    ignored_range: Option<FeeRangeId>,
    connection: &Connection,
) -> f64 {
    let mut ranges = match list_fee_ranges(wallet_id, connection) {
        Ok(ranges) => ranges,
        Err(error) => {
            tracing::warn!("Could not load fee ranges for wallet {wallet_id}: {error}");
            Vec::new()
        }
    };

    if let Some(ignored) = ignored_range {
        ranges.retain(|range| range.id != ignored);
    }

    if let Some(fee) = match_fee_range(amount, transaction_type, &ranges) {
        return fee;
    }

    let rate = get_default_rate(wallet_id, connection);

    ladder_fee(amount, transaction_type, rate)
}

/// Find the first fee range containing `amount`.
///
/// For cash-out the sender hands over `amount` including the fee, so each
/// candidate range is tested against `amount` minus its own fee.
fn match_fee_range(
    amount: f64,
    transaction_type: TransactionType,
    ranges: &[FeeRange],
) -> Option<f64> {
    for range in ranges {
        let modified_amount = match transaction_type {
            TransactionType::CashIn => amount,
            TransactionType::CashOut => amount - range.fee,
        };

        if range.amount_start <= modified_amount && modified_amount <= range.amount_end {
            return Some(range.fee);
        }
    }

    None
}

/// The 500 peso band ladder used when no custom range matches.
fn ladder_fee(amount: f64, transaction_type: TransactionType, rate: f64) -> f64 {
    match transaction_type {
        TransactionType::CashIn => (amount / LADDER_WIDTH).ceil() * LADDER_WIDTH * rate,
        TransactionType::CashOut => {
            // The handed-over amount includes the fee, so compare the fee for
            // the band below against the overshoot past that band.
            let band_floor = (amount / LADDER_WIDTH).floor() * LADDER_WIDTH;
            let fee = band_floor * rate;
            let overshoot = amount - band_floor;

            if fee >= overshoot {
                fee
            } else {
                fee + LADDER_WIDTH * rate
            }
        }
    }
}
