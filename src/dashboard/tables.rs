//! The table of the most recent transactions shown on the dashboard.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency, link,
    },
    time_format::TIME_FORMAT,
    transaction::TransactionDto,
};

const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Renders the most recent transactions with a link to the full list.
pub(super) fn recent_transactions_table(transactions: &[TransactionDto]) -> Markup {
    html! {
        section id="recent-transactions" class="w-full mx-auto mb-4"
        {
            div class="flex justify-between items-end mb-4"
            {
                h3 class="text-xl font-semibold" { "Recent Transactions" }

                (link(endpoints::TRANSACTIONS_VIEW, "View all"))
            }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Customer" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            @let amount_style = if transaction.amount.is_sign_negative() {
                                TABLE_CELL_RED_STYLE
                            } else {
                                TABLE_CELL_GREEN_STYLE
                            };

                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    a
                                        href=(format_endpoint(
                                            endpoints::EDIT_TRANSACTION_VIEW,
                                            &transaction.trans_num,
                                        ))
                                        class=(LINK_STYLE)
                                        title=(transaction.trans_num)
                                    {
                                        (transaction.date) " "
                                        (transaction.time.format(TIME_FORMAT).unwrap_or_default())
                                    }
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (transaction.customer_full_name.as_deref().unwrap_or_default())
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (transaction.category_description.as_deref().unwrap_or_default())
                                }
                                td class={(TABLE_CELL_STYLE) " text-right " (amount_style)}
                                {
                                    (format_currency(transaction.amount))
                                }
                            }
                        }

                        @if transactions.is_empty() {
                            tr
                            {
                                td
                                    colspan="4"
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "No transactions yet."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use scraper::{Html, Selector};
    use time::macros::{date, time};

    use crate::transaction::TransactionDto;

    use super::recent_transactions_table;

    #[test]
    fn shows_a_row_per_transaction() {
        let transactions = [TransactionDto {
            trans_num: "TR-1".to_owned(),
            amount: Decimal::new(-5025, 2),
            date: date!(2025 - 03 - 04),
            time: time!(18:45),
            category_id: 1,
            customer_id: 1,
            category_description: Some("Groceries".to_owned()),
            customer_full_name: Some("John Doe".to_owned()),
        }];

        let html = Html::parse_fragment(&recent_transactions_table(&transactions).into_string());

        let cells: Vec<String> = html
            .select(&Selector::parse("tbody tr td").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect();
        assert_eq!(
            cells,
            ["2025-03-04 18:45:00", "John Doe", "Groceries", "-$50.25"]
        );
        let link = html
            .select(&Selector::parse("tbody a").unwrap())
            .next()
            .unwrap();
        assert_eq!(link.value().attr("href"), Some("/transactions/TR-1/edit"));
    }

    #[test]
    fn shows_placeholder_when_empty() {
        let html = Html::parse_fragment(&recent_transactions_table(&[]).into_string());

        let text: String = html
            .select(&Selector::parse("tbody").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();
        assert!(text.contains("No transactions yet."));
    }
}
