//! Summary cards for the totals across every transaction.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{html::format_currency, transaction::Totals};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-2";
const GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for zero or more, red for negative).
fn amount_color_class(amount: Decimal) -> &'static str {
    if amount.is_sign_negative() && !amount.is_zero() {
        RED_STYLE
    } else {
        GREEN_STYLE
    }
}

fn card(title: &str, value: &str, value_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE) aria-label=(format!("{title}: {value}"))
        {
            h4 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (title) }
            p class={"text-2xl font-bold " (value_style)} { (value) }
        }
    }
}

/// Renders the income, expenses, net and transaction count cards.
pub(super) fn summary_cards_view(totals: &Totals) -> Markup {
    html! {
        section id="summary-cards" class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
            {
                (card("Total Income", &format_currency(totals.income), GREEN_STYLE))
                (card("Total Expenses", &format_currency(totals.expenses), RED_STYLE))
                (card(
                    "Net Amount",
                    &format_currency(totals.net),
                    amount_color_class(totals.net),
                ))
                (card("Transactions", &totals.count.to_string(), ""))
            }
        }
    }
}
