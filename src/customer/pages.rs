//! The customer list, create, edit and delete pages.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use time::Date;

use crate::{
    Database, Error,
    alert::Alert,
    customer::{
        api::CustomerState,
        domain::{CustomerDto, CustomerInput, MAX_TEXT_LENGTH},
        service,
    },
    database_id::CustomerId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, SearchQuery, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links, search_form,
    },
    navigation::NavBar,
    reference::{self, Gender, Profession},
    timezone,
};

/// Render the customer table, filtered by the `q` query parameter.
pub async fn get_customers_page(
    State(state): State<CustomerState>,
    Query(search): Query<SearchQuery>,
) -> Response {
    let today = timezone::today(&state.local_timezone);

    match state
        .database
        .run(|connection| service::search(&search.q, today, connection))
    {
        Ok(customers) => customers_view(&customers, &search.q).into_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve customers: {error}");
            error.into_page_response()
        }
    }
}

/// Render the form for creating a customer.
pub async fn get_new_customer_page(State(state): State<CustomerState>) -> Response {
    let today = timezone::today(&state.local_timezone);

    match state.database.run(get_reference_options) {
        Ok((genders, professions)) => {
            customer_form_view(None, &genders, &professions, today).into_response()
        }
        Err(error) => error.into_page_response(),
    }
}

/// Handle the create customer form.
pub async fn create_customer_form_endpoint(
    State(state): State<CustomerState>,
    Form(input): Form<CustomerInput>,
) -> Response {
    let today = timezone::today(&state.local_timezone);

    match state
        .database
        .run_in_transaction(|connection| service::create(input.clone(), today, connection))
    {
        Ok(_) => redirect_to_customers(),
        Err(error) => error.into_alert_response(),
    }
}

/// Render the form for editing the customer with `customer_id`.
pub async fn get_edit_customer_page(
    State(state): State<CustomerState>,
    Path(customer_id): Path<CustomerId>,
) -> Response {
    let today = timezone::today(&state.local_timezone);

    let result = state.database.run(|connection| {
        let customer = service::get_by_id(customer_id, today, connection)?;
        let (genders, professions) = get_reference_options(connection)?;

        Ok((customer, genders, professions))
    });

    match result {
        Ok((customer, genders, professions)) => {
            customer_form_view(Some(&customer), &genders, &professions, today).into_response()
        }
        Err(error) => error.into_page_response(),
    }
}

/// Handle the edit customer form.
pub async fn update_customer_form_endpoint(
    State(state): State<CustomerState>,
    Path(customer_id): Path<CustomerId>,
    Form(input): Form<CustomerInput>,
) -> Response {
    let today = timezone::today(&state.local_timezone);

    match state.database.run_in_transaction(|connection| {
        service::update(customer_id, input.clone(), today, connection)
    }) {
        Ok(_) => redirect_to_customers(),
        Err(error) => error.into_alert_response(),
    }
}

/// Delete a customer, responding with an alert.
pub async fn delete_customer_form_endpoint(
    State(database): State<Database>,
    Path(customer_id): Path<CustomerId>,
) -> Response {
    match database.run_in_transaction(|connection| service::delete(customer_id, connection)) {
        Ok(()) => Alert::SuccessSimple {
            message: "The customer was deleted.".to_owned(),
        }
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn redirect_to_customers() -> Response {
    (
        HxRedirect(endpoints::CUSTOMERS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

fn get_reference_options(
    connection: &rusqlite::Connection,
) -> Result<(Vec<Gender>, Vec<Profession>), Error> {
    Ok((
        reference::list::<Gender>(connection)?,
        reference::list::<Profession>(connection)?,
    ))
}

fn customers_view(customers: &[CustomerDto], search: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW).into_html();

    let table_row = |customer: &CustomerDto| {
        let edit_url = format_endpoint(endpoints::EDIT_CUSTOMER_VIEW, customer.id);
        let delete_url = format_endpoint(endpoints::CUSTOMER_VIEW, customer.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? This cannot be undone.",
            customer.full_name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (customer.full_name) }
                td class=(TABLE_CELL_STYLE) { (customer.age) }
                td class=(TABLE_CELL_STYLE) { (customer.gender_name.as_deref().unwrap_or_default()) }
                td class=(TABLE_CELL_STYLE) { (customer.city) }
                td class=(TABLE_CELL_STYLE)
                {
                    (customer.profession_description.as_deref().unwrap_or_default())
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
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Customers" }

                    a href=(endpoints::NEW_CUSTOMER_VIEW) class=(BUTTON_SECONDARY_STYLE)
                    {
                        "New Customer"
                    }
                }

                (search_form(endpoints::CUSTOMERS_VIEW, search, "Search by name or city"))

                section class="dark:bg-gray-800 w-full overflow-x-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Age" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Gender" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "City" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Profession" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for customer in customers {
                                (table_row(customer))
                            }

                            @if customers.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No customers found."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Customers", &[], &content)
}

fn text_input(name: &str, label: &str, value: &str) -> Markup {
    html!(
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                id=(name)
                type="text"
                name=(name)
                value=(value)
                placeholder=(label)
                maxlength=(MAX_TEXT_LENGTH)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    )
}

/// The create form when `customer` is `None`, otherwise the edit form.
fn customer_form_view(
    customer: Option<&CustomerDto>,
    genders: &[Gender],
    professions: &[Profession],
    today: Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW).into_html();
    let (title, hx_post, hx_put) = match customer {
        Some(customer) => (
            "Edit Customer",
            None,
            Some(format_endpoint(endpoints::CUSTOMER_VIEW, customer.id)),
        ),
        None => (
            "New Customer",
            Some(endpoints::CUSTOMERS_VIEW.to_owned()),
            None,
        ),
    };
    let gender_id = customer.map(|customer| customer.gender_id);
    let profession_id = customer.map(|customer| customer.profession_id);

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

                (text_input(
                    "firstName",
                    "First Name",
                    customer.map(|customer| customer.first_name.as_str()).unwrap_or_default(),
                ))
                (text_input(
                    "lastName",
                    "Last Name",
                    customer.map(|customer| customer.last_name.as_str()).unwrap_or_default(),
                ))

                div
                {
                    label for="dateOfBirth" class=(FORM_LABEL_STYLE) { "Date of Birth" }

                    input
                        id="dateOfBirth"
                        type="date"
                        name="dateOfBirth"
                        max=(today)
                        value=[customer.map(|customer| customer.date_of_birth)]
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="genderId" class=(FORM_LABEL_STYLE) { "Gender" }

                    select id="genderId" name="genderId" required class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { "Select a gender" }

                        @for gender in genders {
                            option value=[gender.id] selected[gender.id == gender_id] { (gender.name) }
                        }
                    }
                }

                (text_input(
                    "city",
                    "City",
                    customer.map(|customer| customer.city.as_str()).unwrap_or_default(),
                ))

                div
                {
                    label for="professionId" class=(FORM_LABEL_STYLE) { "Profession" }

                    select
                        id="professionId"
                        name="professionId"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { "Select a profession" }

                        @for profession in professions {
                            option
                                value=[profession.id]
                                selected[profession.id == profession_id]
                            {
                                (profession.description)
                            }
                        }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Customer" }
            }
        }
    };

    base(title, &[], &content)
}
