//! The transactions page and its delete handler.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Database, Error,
    alert::Alert,
    customer::{CustomerDto, list_customers},
    database_id::{CustomerId, DatabaseId, TransactionNumber},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links,
        format_currency,
    },
    navigation::NavBar,
    reference::{self, Category},
    time_format::{TIME_FORMAT, blank_as_none_date, blank_as_none_id},
    timezone,
    transaction::{api::TransactionState, core::TransactionDto, service},
};

/// The filters on the transactions page. Every filter is optional.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    #[serde(default, deserialize_with = "blank_as_none_id")]
    pub customer_id: Option<CustomerId>,
    #[serde(default, deserialize_with = "blank_as_none_id")]
    pub category_id: Option<DatabaseId>,
    #[serde(default, deserialize_with = "blank_as_none_date")]
    pub start_date: Option<Date>,
    #[serde(default, deserialize_with = "blank_as_none_date")]
    pub end_date: Option<Date>,
}

impl TransactionsQuery {
    fn validate(&self) -> Result<(), Error> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => Err(Error::InvalidDateRange),
            _ => Ok(()),
        }
    }

    fn matches(&self, transaction: &TransactionDto) -> bool {
        self.customer_id
            .is_none_or(|customer_id| transaction.customer_id == customer_id)
            && self
                .category_id
                .is_none_or(|category_id| transaction.category_id == category_id)
            && self.start_date.is_none_or(|start| transaction.date >= start)
            && self.end_date.is_none_or(|end| transaction.date <= end)
    }
}

struct TransactionsPageData {
    transactions: Vec<TransactionDto>,
    customers: Vec<CustomerDto>,
    categories: Vec<Category>,
}

/// Render the transaction table with the filter form.
pub async fn get_transactions_page(
    State(state): State<TransactionState>,
    Query(query): Query<TransactionsQuery>,
) -> Response {
    let today = timezone::today(&state.local_timezone);

    let result = state.database.run(|connection| {
        let mut transactions = service::list_all(connection)?;
        transactions.retain(|transaction| query.matches(transaction));

        Ok(TransactionsPageData {
            transactions,
            customers: list_customers(today, connection)?,
            categories: reference::list::<Category>(connection)?,
        })
    });

    match result {
        Ok(data) => {
            let error_message = query.validate().err().map(|error| error.to_string());
            transactions_view(&data, &query, error_message.as_deref()).into_response()
        }
        Err(error) => {
            tracing::error!("Failed to retrieve transactions: {error}");
            error.into_page_response()
        }
    }
}

/// Delete a transaction, responding with an alert.
pub async fn delete_transaction_form_endpoint(
    State(database): State<Database>,
    Path(trans_num): Path<TransactionNumber>,
) -> Response {
    match database.run_in_transaction(|connection| service::delete(&trans_num, connection)) {
        Ok(()) => Alert::SuccessSimple {
            message: "The transaction was deleted.".to_owned(),
        }
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn filter_form(data: &TransactionsPageData, query: &TransactionsQuery) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="grid grid-cols-1 md:grid-cols-5 gap-2 items-end w-full"
        {
            div
            {
                label for="customer_id" class=(FORM_LABEL_STYLE) { "Customer" }

                select id="customer_id" name="customer_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All customers" }

                    @for customer in &data.customers {
                        option
                            value=(customer.id)
                            selected[query.customer_id == Some(customer.id)]
                        {
                            (customer.full_name)
                        }
                    }
                }
            }

            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                select id="category_id" name="category_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All categories" }

                    @for category in &data.categories {
                        option
                            value=[category.id]
                            selected[category.id.is_some() && query.category_id == category.id]
                        {
                            (category.description)
                        }
                    }
                }
            }

            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }

                input
                    id="start_date"
                    type="date"
                    name="start_date"
                    value=[query.start_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }

                input
                    id="end_date"
                    type="date"
                    name="end_date"
                    value=[query.end_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Filter" }
        }
    )
}

fn transactions_view(
    data: &TransactionsPageData,
    query: &TransactionsQuery,
    error_message: Option<&str>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let table_row = |transaction: &TransactionDto| {
        let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, &transaction.trans_num);
        let delete_url = format_endpoint(endpoints::TRANSACTION_VIEW, &transaction.trans_num);
        let confirm_message = format!(
            "Are you sure you want to delete transaction '{}'? This cannot be undone.",
            transaction.trans_num
        );
        let amount_style = if transaction.amount.is_sign_negative() {
            "text-red-600 dark:text-red-400"
        } else {
            "text-green-600 dark:text-green-400"
        };

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (transaction.trans_num) }
                td class=(TABLE_CELL_STYLE) { (transaction.date) }
                td class=(TABLE_CELL_STYLE) { (transaction.time.format(TIME_FORMAT).unwrap_or_default()) }
                td class={(TABLE_CELL_STYLE) " text-right " (amount_style)}
                {
                    (format_currency(transaction.amount))
                }
                td class=(TABLE_CELL_STYLE)
                {
                    (transaction.category_description.as_deref().unwrap_or_default())
                }
                td class=(TABLE_CELL_STYLE)
                {
                    (transaction.customer_full_name.as_deref().unwrap_or_default())
                }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(BUTTON_SECONDARY_STYLE)
                    {
                        "New Transaction"
                    }
                }

                (filter_form(data, query))

                @if let Some(error_message) = error_message {
                    p class="text-red-600 dark:text-red-400" { (error_message) }
                }

                section class="dark:bg-gray-800 w-full overflow-x-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Number" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Time" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Customer" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in &data.transactions {
                                (table_row(transaction))
                            }

                            @if data.transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions found."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &[], &content)
}
