//! Summary cards for the dashboard.

use maud::{Markup, html};

use crate::{dashboard::aggregation::Totals, html::currency_rounded_with_tooltip};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

fn summary_card(label: &str, value: Markup) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            div class="text-sm text-gray-600 dark:text-gray-400 mb-1" { (label) }

            div class="text-3xl font-bold" { (value) }
        }
    }
}

/// Renders the summary cards section across the top of the dashboard.
pub(super) fn summary_cards_view(totals: &Totals) -> Markup {
    html! {
        section class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
            {
                (summary_card("Cash In", currency_rounded_with_tooltip(totals.cash_in)))

                (summary_card("Cash Out", currency_rounded_with_tooltip(totals.cash_out)))

                (summary_card("Fees Earned", currency_rounded_with_tooltip(totals.fees)))

                (summary_card(
                    "Unclaimed",
                    html! {
                        (currency_rounded_with_tooltip(totals.unclaimed_amount))
                        " "
                        span class="text-sm font-normal text-gray-600 dark:text-gray-400"
                        {
                            "(" (totals.unclaimed_count) " records)"
                        }
                    },
                ))
            }
        }
    }
}
