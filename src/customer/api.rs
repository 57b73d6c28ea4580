//! JSON route handlers for customers.

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Database, Error,
    customer::{
        domain::{CustomerDto, CustomerInput},
        service,
    },
    database_id::CustomerId,
    endpoints::{self, format_endpoint},
    timezone,
};

/// The state needed by the customer handlers.
#[derive(Debug, Clone)]
pub struct CustomerState {
    /// The application database.
    pub database: Database,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CustomerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            database: state.database.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// List every customer.
pub async fn list_customers_endpoint(
    State(state): State<CustomerState>,
) -> Result<Json<Vec<CustomerDto>>, Error> {
    let today = timezone::today(&state.local_timezone);

    state
        .database
        .run(|connection| service::list_all(today, connection))
        .inspect_err(|error| tracing::error!("Could not list customers: {error}"))
        .map(Json)
}

/// Get a single customer.
pub async fn get_customer_endpoint(
    State(state): State<CustomerState>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Json<CustomerDto>, Error> {
    let today = timezone::today(&state.local_timezone);

    state
        .database
        .run(|connection| service::get_by_id(customer_id, today, connection))
        .map(Json)
}

/// Create a customer, responding with 201 Created and the new customer.
pub async fn create_customer_endpoint(
    State(state): State<CustomerState>,
    Json(input): Json<CustomerInput>,
) -> Result<Response, Error> {
    let today = timezone::today(&state.local_timezone);

    let customer = state
        .database
        .run_in_transaction(|connection| service::create(input.clone(), today, connection))?;
    let location = format_endpoint(endpoints::CUSTOMER_API, customer.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(customer)).into_response())
}

/// Overwrite a customer and respond with the updated customer.
pub async fn update_customer_endpoint(
    State(state): State<CustomerState>,
    Path(customer_id): Path<CustomerId>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<CustomerDto>, Error> {
    let today = timezone::today(&state.local_timezone);

    state
        .database
        .run_in_transaction(|connection| {
            service::update(customer_id, input.clone(), today, connection)
        })
        .map(Json)
}

/// Delete a customer, responding with 204 No Content.
pub async fn delete_customer_endpoint(
    State(state): State<CustomerState>,
    Path(customer_id): Path<CustomerId>,
) -> Result<StatusCode, Error> {
    state
        .database
        .run_in_transaction(|connection| service::delete(customer_id, connection))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::test_utils::{get_seeded_server, get_test_server};

    fn new_customer() -> Value {
        json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "genderId": 2,
            "dateOfBirth": "1990-12-10",
            "city": "London",
            "professionId": 1
        })
    }

    #[tokio::test]
    async fn list_returns_seeded_customers_with_display_fields() {
        let server = get_seeded_server();

        let customers: Vec<Value> = server.get("/api/customers").await.json();

        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0]["fullName"], "John Doe");
        assert_eq!(customers[0]["genderName"], "Male");
        assert_eq!(customers[0]["professionDescription"], "Software Engineer");
        assert_eq!(customers[1]["dateOfBirth"], "1990-08-22");
    }

    #[tokio::test]
    async fn create_returns_location_and_body() {
        let server = get_seeded_server();

        let response = server.post("/api/customers").json(&new_customer()).await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.header("location"), "/api/customers/3");
        let body: Value = response.json();
        assert_eq!(body["id"], 3);
        assert_eq!(body["fullName"], "Ada Lovelace");
        assert_eq!(body["genderName"], "Female");
    }

    #[tokio::test]
    async fn create_with_unknown_profession_is_bad_request() {
        let server = get_seeded_server();
        let mut customer = new_customer();
        customer["professionId"] = json!(99);

        let response = server.post("/api/customers").json(&customer).await;

        response.assert_status_bad_request();
        let customers: Vec<Value> = server.get("/api/customers").await.json();
        assert_eq!(customers.len(), 2);
    }

    #[tokio::test]
    async fn create_with_blank_city_is_bad_request() {
        let server = get_seeded_server();
        let mut customer = new_customer();
        customer["city"] = json!(" ");

        let response = server.post("/api/customers").json(&customer).await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "message": "City is required." }));
    }

    #[tokio::test]
    async fn get_missing_customer_is_not_found() {
        let server = get_test_server();

        server
            .get("/api/customers/1")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn update_returns_updated_customer() {
        let server = get_seeded_server();

        let response = server.put("/api/customers/2").json(&new_customer()).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["id"], 2);
        assert_eq!(body["city"], "London");
    }

    #[tokio::test]
    async fn update_missing_customer_is_not_found() {
        let server = get_seeded_server();

        server
            .put("/api/customers/42")
            .json(&new_customer())
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_customer_with_transactions_is_blocked() {
        let server = get_seeded_server();

        let response = server.delete("/api/customers/1").await;

        response.assert_status_bad_request();
        response.assert_json(
            &json!({ "message": "Cannot delete customer with existing transactions." }),
        );
    }

    #[tokio::test]
    async fn delete_customer_without_transactions() {
        let server = get_seeded_server();
        server.post("/api/customers").json(&new_customer()).await;

        let response = server.delete("/api/customers/3").await;

        response.assert_status(StatusCode::NO_CONTENT);
        server
            .get("/api/customers/3")
            .await
            .assert_status_not_found();
        server
            .delete("/api/customers/3")
            .await
            .assert_status_not_found();
    }
}
