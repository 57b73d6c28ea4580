//! Application router configuration for the JSON API and the HTML views.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, put},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{
    AppState,
    customer::{
        create_customer_endpoint, create_customer_form_endpoint, delete_customer_endpoint,
        delete_customer_form_endpoint, get_customer_endpoint, get_customers_page,
        get_edit_customer_page, get_new_customer_page, list_customers_endpoint,
        update_customer_endpoint, update_customer_form_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    error_response::{error_detail_middleware, handle_panic},
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    reference::{
        Category, Gender, Profession, ReferenceEntity, create_endpoint,
        create_reference_endpoint, delete_endpoint, delete_reference_endpoint, get_edit_reference_page,
        get_endpoint, get_reference_page, list_endpoint, update_endpoint,
        update_reference_endpoint,
    },
    transaction::{
        category_summary_endpoint, create_transaction_endpoint, create_transaction_form_endpoint,
        delete_transaction_endpoint, delete_transaction_form_endpoint,
        get_edit_transaction_page, get_new_transaction_page, get_transaction_endpoint,
        get_transactions_page, list_transactions_by_category_endpoint,
        list_transactions_by_customer_endpoint, list_transactions_by_date_range_endpoint,
        list_transactions_endpoint, monthly_summary_endpoint, update_transaction_endpoint,
        update_transaction_form_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Panics in handlers are turned into 500 responses, and in development mode
/// the body of a 500 response carries the raw error details.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            endpoints::CUSTOMERS_API,
            get(list_customers_endpoint).post(create_customer_endpoint),
        )
        .route(
            endpoints::CUSTOMER_API,
            get(get_customer_endpoint)
                .put(update_customer_endpoint)
                .delete(delete_customer_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_BY_CUSTOMER_API,
            get(list_transactions_by_customer_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_BY_CATEGORY_API,
            get(list_transactions_by_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_BY_DATE_RANGE_API,
            get(list_transactions_by_date_range_endpoint),
        )
        .route(
            endpoints::CATEGORY_SUMMARY_API,
            get(category_summary_endpoint),
        )
        .route(endpoints::MONTHLY_SUMMARY_API, get(monthly_summary_endpoint))
        .route(
            endpoints::TRANSACTION_API,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .merge(reference_api_routes::<Gender>())
        .merge(reference_api_routes::<Profession>())
        .merge(reference_api_routes::<Category>());

    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::TRANSACTIONS_VIEW,
            get(get_transactions_page).post(create_transaction_form_endpoint),
        )
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(
            endpoints::TRANSACTION_VIEW,
            put(update_transaction_form_endpoint)
                .delete(delete_transaction_form_endpoint),
        )
        .route(
            endpoints::CUSTOMERS_VIEW,
            get(get_customers_page).post(create_customer_form_endpoint),
        )
        .route(endpoints::NEW_CUSTOMER_VIEW, get(get_new_customer_page))
        .route(endpoints::EDIT_CUSTOMER_VIEW, get(get_edit_customer_page))
        .route(
            endpoints::CUSTOMER_VIEW,
            put(update_customer_form_endpoint)
                .delete(delete_customer_form_endpoint),
        )
        .merge(reference_view_routes::<Gender>())
        .merge(reference_view_routes::<Profession>())
        .merge(reference_view_routes::<Category>())
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let environment = state.environment;

    api_routes
        .merge(view_routes)
        .fallback(get_404_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(
            environment,
            error_detail_middleware,
        ))
        .with_state(state)
}

/// The JSON routes for listing, creating, reading, updating and deleting `R`.
fn reference_api_routes<R: ReferenceEntity>() -> Router<AppState> {
    Router::new()
        .route(
            R::API_ENDPOINT,
            get(list_endpoint::<R>).post(create_endpoint::<R>),
        )
        .route(
            R::API_ITEM_ENDPOINT,
            get(get_endpoint::<R>)
                .put(update_endpoint::<R>)
                .delete(delete_endpoint::<R>),
        )
}

/// The list page, inline create form, edit page and delete action for `R`.
fn reference_view_routes<R: ReferenceEntity>() -> Router<AppState> {
    Router::new()
        .route(
            R::VIEW_ENDPOINT,
            get(get_reference_page::<R>).post(create_reference_endpoint::<R>),
        )
        .route(R::EDIT_VIEW_ENDPOINT, get(get_edit_reference_page::<R>))
        .route(
            R::ITEM_VIEW_ENDPOINT,
            put(update_reference_endpoint::<R>).delete(delete_reference_endpoint::<R>),
        )
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_utils::{assert_valid_html, get_test_server, parse_html_text};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let server = get_test_server();

        let response = server.get("/").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/dashboard");
    }

    #[tokio::test]
    async fn unknown_path_renders_404_page() {
        let server = get_test_server();

        let response = server.get("/no/such/page").await;

        response.assert_status_not_found();
        assert_valid_html(&parse_html_text(&response.text()));
    }

    #[tokio::test]
    async fn every_reference_list_page_is_routed() {
        let server = get_test_server();

        for path in ["/genders", "/professions", "/categories"] {
            server.get(path).await.assert_status_ok();
        }
    }

    #[tokio::test]
    async fn every_reference_api_is_routed() {
        let server = get_test_server();

        for path in ["/api/genders", "/api/professions", "/api/categories"] {
            let response = server.get(path).await;

            response.assert_status_ok();
            response.assert_json(&serde_json::json!([]));
        }
    }

    #[tokio::test]
    async fn internal_error_page_is_routed() {
        let server = get_test_server();

        server
            .get("/error")
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}
