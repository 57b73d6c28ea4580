//! The pages and form handlers for creating and editing transactions.

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, Time};

use crate::{
    Error,
    customer::{CustomerDto, list_customers},
    database_id::TransactionNumber,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles,
    },
    navigation::NavBar,
    reference::{self, Category},
    time_format::TIME_FORMAT,
    timezone,
    transaction::{
        api::TransactionState,
        core::{MAX_TRANSACTION_NUMBER_LENGTH, TransactionDto, TransactionInput},
        service,
    },
};

/// The values the form starts with.
struct FormDefaults<'a> {
    transaction: Option<&'a TransactionDto>,
    date: Date,
    time: Time,
}

fn get_form_options(connection: &Connection, today: Date) -> Result<(Vec<Category>, Vec<CustomerDto>), Error> {
    Ok((
        reference::list::<Category>(connection)?,
        list_customers(today, connection)?,
    ))
}

/// Render the page for creating a transaction.
pub async fn get_new_transaction_page(State(state): State<TransactionState>) -> Response {
    let today = timezone::today(&state.local_timezone);

    match state
        .database
        .run(|connection| get_form_options(connection, today))
    {
        Ok((categories, customers)) => {
            let defaults = FormDefaults {
                transaction: None,
                date: today,
                time: Time::MIDNIGHT,
            };

            transaction_form_view(&defaults, &categories, &customers).into_response()
        }
        Err(error) => error.into_page_response(),
    }
}

/// Render the page for editing the transaction with `trans_num`.
pub async fn get_edit_transaction_page(
    State(state): State<TransactionState>,
    Path(trans_num): Path<TransactionNumber>,
) -> Response {
    let today = timezone::today(&state.local_timezone);

    let result = state.database.run(|connection| {
        let transaction = service::get_by_number(&trans_num, connection)?;
        let (categories, customers) = get_form_options(connection, today)?;

        Ok((transaction, categories, customers))
    });

    match result {
        Ok((transaction, categories, customers)) => {
            let defaults = FormDefaults {
                transaction: Some(&transaction),
                date: transaction.date,
                time: transaction.time,
            };

            transaction_form_view(&defaults, &categories, &customers).into_response()
        }
        Err(error) => error.into_page_response(),
    }
}

/// Handle the create transaction form.
pub async fn create_transaction_form_endpoint(
    State(state): State<TransactionState>,
    Form(input): Form<TransactionInput>,
) -> Response {
    let today = timezone::today(&state.local_timezone);

    match state
        .database
        .run_in_transaction(|connection| service::create(&input, today, connection))
    {
        Ok(_) => redirect_to_transactions(),
        Err(error) => error.into_alert_response(),
    }
}

/// Handle the edit transaction form.
pub async fn update_transaction_form_endpoint(
    State(state): State<TransactionState>,
    Path(trans_num): Path<TransactionNumber>,
    Form(input): Form<TransactionInput>,
) -> Response {
    match state
        .database
        .run_in_transaction(|connection| service::update(&trans_num, &input, connection))
    {
        Ok(_) => redirect_to_transactions(),
        Err(error) => error.into_alert_response(),
    }
}

fn redirect_to_transactions() -> Response {
    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

fn transaction_form_view(
    defaults: &FormDefaults,
    categories: &[Category],
    customers: &[CustomerDto],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let transaction = defaults.transaction;
    let (title, hx_post, hx_put) = match transaction {
        Some(transaction) => (
            "Edit Transaction",
            None,
            Some(format_endpoint(
                endpoints::TRANSACTION_VIEW,
                &transaction.trans_num,
            )),
        ),
        None => (
            "New Transaction",
            Some(endpoints::TRANSACTIONS_VIEW.to_owned()),
            None,
        ),
    };
    let category_id = transaction.map(|transaction| transaction.category_id);
    let customer_id = transaction.map(|transaction| transaction.customer_id);
    let time = defaults.time.format(TIME_FORMAT).unwrap_or_default();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=[hx_post]
                hx-put=[hx_put]
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { (title) }

                @if let Some(transaction) = transaction {
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Transaction number: " (transaction.trans_num)
                    }
                } @else {
                    div
                    {
                        label for="transNum" class=(FORM_LABEL_STYLE)
                        {
                            "Transaction Number"
                        }

                        input
                            id="transNum"
                            type="text"
                            name="transNum"
                            placeholder="Leave blank to generate one"
                            maxlength=(MAX_TRANSACTION_NUMBER_LENGTH)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    // w-full needed to ensure input takes the full width when prefilled with a value
                    div class="input-wrapper w-full"
                    {
                        input
                            id="amount"
                            type="number"
                            name="amount"
                            step="0.01"
                            placeholder="0.00"
                            value=[transaction.map(|transaction| transaction.amount)]
                            required
                            autofocus
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        id="date"
                        type="date"
                        name="date"
                        value=(defaults.date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="time" class=(FORM_LABEL_STYLE) { "Time" }

                    input
                        id="time"
                        type="time"
                        name="time"
                        step="1"
                        value=(time)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="categoryId" class=(FORM_LABEL_STYLE) { "Category" }

                    select id="categoryId" name="categoryId" required class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { "Select a category" }

                        @for category in categories {
                            option
                                value=[category.id]
                                selected[category.id.is_some() && category.id == category_id]
                            {
                                (category.description)
                            }
                        }
                    }
                }

                div
                {
                    label for="customerId" class=(FORM_LABEL_STYLE) { "Customer" }

                    select id="customerId" name="customerId" required class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { "Select a customer" }

                        @for customer in customers {
                            option
                                value=(customer.id)
                                selected[Some(customer.id) == customer_id]
                            {
                                (customer.full_name)
                            }
                        }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Transaction" }
            }
        }
    };

    base(title, &[dollar_input_styles()], &content)
}
