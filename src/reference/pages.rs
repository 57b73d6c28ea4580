//! The list, create, edit and delete pages for reference data.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Database, Error,
    alert::Alert,
    database_id::DatabaseId,
    endpoints::format_endpoint,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, SearchQuery, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, search_form,
    },
    navigation::NavBar,
    reference::{ReferenceEntity, service},
};

/// Form data for creating and editing reference data.
#[derive(Debug, Deserialize)]
pub struct ReferenceForm {
    pub label: String,
}

/// Render the list page for `R`, filtered by the `q` query parameter.
pub async fn get_reference_page<R: ReferenceEntity>(
    State(database): State<Database>,
    Query(search): Query<SearchQuery>,
) -> Response {
    match database.run(|connection| service::list_with_counts::<R>(&search.q, connection)) {
        Ok(rows) => reference_list_view(&rows, &search.q).into_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve {}: {error}", R::TITLE);
            error.into_page_response()
        }
    }
}

/// Handle the inline create form on the list page.
pub async fn create_reference_endpoint<R: ReferenceEntity>(
    State(database): State<Database>,
    Form(form): Form<ReferenceForm>,
) -> Response {
    match database.run_in_transaction(|connection| service::create::<R>(&form.label, connection)) {
        Ok(_) => (
            HxRedirect(R::VIEW_ENDPOINT.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Render the edit page for the `R` with `id`.
pub async fn get_edit_reference_page<R: ReferenceEntity>(
    State(database): State<Database>,
    Path(id): Path<DatabaseId>,
) -> Response {
    match database.run(|connection| service::get::<R>(id, connection)) {
        Ok(entity) => edit_reference_view(&entity, id).into_response(),
        Err(error) => error.into_page_response(),
    }
}

/// Handle the edit form for the `R` with `id`.
pub async fn update_reference_endpoint<R: ReferenceEntity>(
    State(database): State<Database>,
    Path(id): Path<DatabaseId>,
    Form(form): Form<ReferenceForm>,
) -> Response {
    match database
        .run_in_transaction(|connection| service::update::<R>(id, &form.label, connection))
    {
        Ok(_) => (
            HxRedirect(R::VIEW_ENDPOINT.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Delete the `R` with `id`, responding with an alert.
pub async fn delete_reference_endpoint<R: ReferenceEntity>(
    State(database): State<Database>,
    Path(id): Path<DatabaseId>,
) -> Response {
    match database.run_in_transaction(|connection| service::delete::<R>(id, connection)) {
        // The status code has to be 200 OK or htmx will not delete the table row.
        Ok(()) => Alert::SuccessSimple {
            message: format!("The {} was deleted.", R::SINGULAR),
        }
        .into_response(),
        Err(error) => {
            tracing::debug!("Could not delete {} {id}: {error}", R::SINGULAR);
            error.into_alert_response()
        }
    }
}

fn label_input<R: ReferenceEntity>(value: &str) -> Markup {
    html!(
        label for="label" class=(FORM_LABEL_STYLE) { (R::LABEL) }

        input
            id="label"
            type="text"
            name="label"
            value=(value)
            placeholder=(R::LABEL)
            maxlength=(R::MAX_LENGTH)
            required
            class=(FORM_TEXT_INPUT_STYLE);
    )
}

fn reference_list_view<R: ReferenceEntity>(rows: &[(R, i64)], search: &str) -> Markup {
    let nav_bar = NavBar::new(R::VIEW_ENDPOINT).into_html();

    let table_row = |(entity, dependent_count): &(R, i64)| {
        let id = entity.id().unwrap_or_default();
        let edit_url = format_endpoint(R::EDIT_VIEW_ENDPOINT, id);
        let delete_url = format_endpoint(R::ITEM_VIEW_ENDPOINT, id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? This cannot be undone.",
            entity.label()
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (entity.label()) }
                td class=(TABLE_CELL_STYLE) { (dependent_count) }
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
                    h1 class="text-xl font-bold" { (R::TITLE) }
                }

                (search_form(R::VIEW_ENDPOINT, search, &format!("Search {}", R::TITLE.to_lowercase())))

                form
                    id="create-form"
                    hx-post=(R::VIEW_ENDPOINT)
                    hx-target-error="#alert-container"
                    class="flex items-end gap-2 w-full"
                {
                    div class="flex-1" { (label_input::<R>("")) }

                    button type="submit" class="px-4 py-2.5 bg-blue-500 text-white rounded"
                    {
                        "Add"
                    }
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
                                th scope="col" class=(TABLE_CELL_STYLE) { (R::LABEL) }
                                th scope="col" class=(TABLE_CELL_STYLE) { (R::DEPENDENTS) }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="3"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "Nothing found."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base(R::TITLE, &[], &content)
}

fn edit_reference_view<R: ReferenceEntity>(entity: &R, id: DatabaseId) -> Markup {
    let nav_bar = NavBar::new(R::VIEW_ENDPOINT).into_html();
    let update_endpoint = format_endpoint(R::ITEM_VIEW_ENDPOINT, id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div { (label_input::<R>(entity.label())) }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
            }
        }
    };

    base(&format!("Edit {}", R::SINGULAR), &[], &content)
}
