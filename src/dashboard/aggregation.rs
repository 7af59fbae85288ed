//! Record aggregation for the dashboard cards and charts.

use std::collections::HashMap;

use time::Date;

use crate::{dashboard::activity::DashboardRecord, record::TransactionType};

/// Summary totals across all wallets for the dashboard cards.
#[derive(Debug, Default, PartialEq)]
pub(super) struct Totals {
    /// The sum of cash-in amounts.
    pub cash_in: f64,
    /// The sum of cash-out amounts.
    pub cash_out: f64,
    /// The sum of fees across both transaction types.
    pub fees: f64,
    /// The number of cash-out records not yet picked up.
    pub unclaimed_count: usize,
    /// The total amount sitting in unclaimed cash-outs.
    pub unclaimed_amount: f64,
}

pub(super) fn calculate_totals(records: &[DashboardRecord]) -> Totals {
    let mut totals = Totals::default();

    for record in records {
        totals.fees += record.fee;

        match record.transaction_type {
            TransactionType::CashIn => totals.cash_in += record.amount,
            TransactionType::CashOut => {
                totals.cash_out += record.amount;

                if !record.is_claimed {
                    totals.unclaimed_count += 1;
                    totals.unclaimed_amount += record.amount;
                }
            }
        }
    }

    totals
}

/// Aggregates fee totals by month.
///
/// # Returns
/// HashMap mapping each month (as Date with day=1) to the sum of fees.
pub(super) fn aggregate_fees_by_month(records: &[DashboardRecord]) -> HashMap<Date, f64> {
    let mut totals = HashMap::new();

    for record in records {
        let month = record.date.replace_day(1).unwrap();
        *totals.entry(month).or_insert(0.0) += record.fee;
    }

    totals
}

/// Formats month dates as three-letter abbreviations.
pub(super) fn format_month_labels(months: &[Date]) -> Vec<String> {
    use time::Month;
    let month_to_str = |date: &Date| {
        match date.month() {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        }
        .to_string()
    };

    months.iter().map(month_to_str).collect()
}

/// Converts monthly fee data into sorted labels and values for charting.
pub(super) fn get_monthly_label_and_value_pairs(
    monthly_totals: &HashMap<Date, f64>,
) -> (Vec<String>, Vec<f64>) {
    let mut sorted_months: Vec<Date> = monthly_totals.keys().copied().collect();
    sorted_months.sort();

    let labels = format_month_labels(&sorted_months);
    let values = sorted_months
        .iter()
        .map(|month| monthly_totals[month])
        .collect();

    (labels, values)
}

/// Sums transaction volume (cash-in plus cash-out amounts) per wallet.
///
/// # Returns
/// Vector of (wallet name, volume) pairs sorted by volume, largest first.
pub(super) fn wallet_volume_totals(records: &[DashboardRecord]) -> Vec<(String, f64)> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for record in records {
        *totals.entry(record.wallet_name.as_str()).or_insert(0.0) += record.amount;
    }

    let mut sorted: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(name, volume)| (name.to_owned(), volume))
        .collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    sorted
}
