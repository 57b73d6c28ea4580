//! JSON route handlers for transactions and their summaries.

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Database, Error,
    database_id::{CustomerId, DatabaseId, TransactionNumber},
    endpoints::{self, format_endpoint},
    time_format::iso_date,
    timezone,
    transaction::{
        core::{TransactionDto, TransactionInput},
        service,
        summary::{TransactionSummary, summarise_by_category, summarise_by_month},
    },
};

/// The state needed for creating transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The application database.
    pub database: Database,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            database: state.database.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string for [list_transactions_by_date_range_endpoint].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
}

/// List every transaction, most recent first.
pub async fn list_transactions_endpoint(
    State(database): State<Database>,
) -> Result<Json<Vec<TransactionDto>>, Error> {
    database
        .run(service::list_all)
        .inspect_err(|error| tracing::error!("Could not list transactions: {error}"))
        .map(Json)
}

/// Get a single transaction.
pub async fn get_transaction_endpoint(
    State(database): State<Database>,
    Path(trans_num): Path<TransactionNumber>,
) -> Result<Json<TransactionDto>, Error> {
    database
        .run(|connection| service::get_by_number(&trans_num, connection))
        .map(Json)
}

/// List the transactions of one customer.
pub async fn list_transactions_by_customer_endpoint(
    State(database): State<Database>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Json<Vec<TransactionDto>>, Error> {
    database
        .run(|connection| service::list_by_customer(customer_id, connection))
        .map(Json)
}

/// List the transactions in one category.
pub async fn list_transactions_by_category_endpoint(
    State(database): State<Database>,
    Path(category_id): Path<DatabaseId>,
) -> Result<Json<Vec<TransactionDto>>, Error> {
    database
        .run(|connection| service::list_by_category(category_id, connection))
        .map(Json)
}

/// List the transactions between `startDate` and `endDate`, both inclusive.
pub async fn list_transactions_by_date_range_endpoint(
    State(database): State<Database>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<TransactionDto>>, Error> {
    database
        .run(|connection| service::list_by_date_range(query.start_date, query.end_date, connection))
        .map(Json)
}

/// Create a transaction, responding with 201 Created and the new transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Json(input): Json<TransactionInput>,
) -> Result<Response, Error> {
    let today = timezone::today(&state.local_timezone);

    let transaction = state
        .database
        .run_in_transaction(|connection| service::create(&input, today, connection))?;
    let location = format_endpoint(endpoints::TRANSACTION_API, &transaction.trans_num);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(transaction)).into_response())
}

/// Overwrite a transaction, responding with 204 No Content.
pub async fn update_transaction_endpoint(
    State(database): State<Database>,
    Path(trans_num): Path<TransactionNumber>,
    Json(input): Json<TransactionInput>,
) -> Result<StatusCode, Error> {
    database.run_in_transaction(|connection| service::update(&trans_num, &input, connection))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a transaction, responding with 204 No Content.
pub async fn delete_transaction_endpoint(
    State(database): State<Database>,
    Path(trans_num): Path<TransactionNumber>,
) -> Result<StatusCode, Error> {
    database.run_in_transaction(|connection| service::delete(&trans_num, connection))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Transaction totals grouped by category, largest first.
pub async fn category_summary_endpoint(
    State(database): State<Database>,
) -> Result<Json<Vec<TransactionSummary>>, Error> {
    database
        .run(summarise_by_category)
        .inspect_err(|error| tracing::error!("Could not summarise by category: {error}"))
        .map(Json)
}

/// Transaction totals for `year` grouped by month.
pub async fn monthly_summary_endpoint(
    State(database): State<Database>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<TransactionSummary>>, Error> {
    database
        .run(|connection| summarise_by_month(year, connection))
        .map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        test_utils::{get_seeded_server, get_test_server},
        transaction::{core::TransactionDto, summary::TransactionSummary},
    };

    fn new_transaction() -> Value {
        json!({
            "amount": -12.5,
            "date": "2025-02-03",
            "time": "08:15",
            "categoryId": 4,
            "customerId": 1
        })
    }

    #[tokio::test]
    async fn list_returns_seeded_transactions_with_display_fields() {
        let server = get_seeded_server();

        let transactions: Vec<TransactionDto> = server.get("/api/transactions").await.json();

        assert_eq!(transactions.len(), 5);
        let salary = transactions
            .iter()
            .find(|transaction| transaction.trans_num == "TR-20250101-123456")
            .unwrap();
        assert_eq!(salary.category_description.as_deref(), Some("Salary"));
        assert_eq!(salary.customer_full_name.as_deref(), Some("John Doe"));
    }

    #[tokio::test]
    async fn get_serializes_amount_as_number_and_time_with_seconds() {
        let server = get_seeded_server();

        let transaction: Value = server
            .get("/api/transactions/TR-20250101-123457")
            .await
            .json();

        assert_eq!(transaction["transNum"], "TR-20250101-123457");
        assert_eq!(transaction["amount"], json!(-50.25));
        assert_eq!(transaction["time"], "18:45:00");
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let server = get_seeded_server();

        server
            .get("/api/transactions/TR-MISSING")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn by_customer_returns_only_their_transactions() {
        let server = get_seeded_server();

        let transactions: Vec<TransactionDto> =
            server.get("/api/transactions/customer/1").await.json();

        assert_eq!(transactions.len(), 3);
    }

    #[tokio::test]
    async fn by_category_returns_only_that_category() {
        let server = get_seeded_server();

        let transactions: Vec<TransactionDto> =
            server.get("/api/transactions/category/12").await.json();

        assert_eq!(transactions.len(), 2);
        assert!(transactions.iter().all(|t| t.category_id == 12));
    }

    #[tokio::test]
    async fn date_range_rejects_reversed_dates() {
        let server = get_seeded_server();

        let response = server
            .get("/api/transactions/daterange")
            .add_query_param("startDate", "2099-01-01")
            .add_query_param("endDate", "2000-01-01")
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "message": "Start date must be before or equal to end date" }));
    }

    #[tokio::test]
    async fn date_range_requires_both_dates() {
        let server = get_seeded_server();

        server
            .get("/api/transactions/daterange")
            .add_query_param("startDate", "2025-01-01")
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn date_range_returns_matching_transactions() {
        let server = get_seeded_server();

        let transactions: Vec<TransactionDto> = server
            .get("/api/transactions/daterange")
            .add_query_param("startDate", "2000-01-01")
            .add_query_param("endDate", "2099-12-31")
            .await
            .json();

        assert_eq!(transactions.len(), 5);
    }

    #[tokio::test]
    async fn create_generates_number_and_sets_location() {
        let server = get_seeded_server();

        let response = server
            .post("/api/transactions")
            .json(&new_transaction())
            .await;

        response.assert_status(StatusCode::CREATED);
        let created: TransactionDto = response.json();
        assert!(created.trans_num.starts_with("TR-"));
        assert_eq!(
            response.header("location"),
            format!("/api/transactions/{}", created.trans_num).as_str()
        );
        assert_eq!(created.category_description.as_deref(), Some("Transportation"));
    }

    #[tokio::test]
    async fn create_keeps_supplied_number() {
        let server = get_seeded_server();
        let mut transaction = new_transaction();
        transaction["transNum"] = json!("CUSTOM-1");

        let response = server.post("/api/transactions").json(&transaction).await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.header("location"), "/api/transactions/CUSTOM-1");
    }

    #[tokio::test]
    async fn supplied_number_with_space_and_accent_round_trips() {
        let server = get_seeded_server();

        for trans_num in ["INV 1", "Ñ-7"] {
            let mut transaction = new_transaction();
            transaction["transNum"] = json!(trans_num);

            let response = server.post("/api/transactions").json(&transaction).await;

            response.assert_status(StatusCode::CREATED);
            let location = response.header("location");
            let location = location.to_str().unwrap();
            let fetched: TransactionDto = server.get(location).await.json();
            assert_eq!(fetched.trans_num, trans_num);
        }

        let fetched: TransactionDto = server.get("/api/transactions/INV%201").await.json();
        assert_eq!(fetched.category_description.as_deref(), Some("Transportation"));
    }

    #[tokio::test]
    async fn create_rejects_number_over_fifty_characters() {
        let server = get_seeded_server();
        let mut transaction = new_transaction();
        transaction["transNum"] = json!("X".repeat(51));

        server
            .post("/api/transactions")
            .json(&transaction)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn create_duplicate_number_is_bad_request() {
        let server = get_seeded_server();
        let mut transaction = new_transaction();
        transaction["transNum"] = json!("TR-20250101-123456");

        let response = server.post("/api/transactions").json(&transaction).await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn create_with_unknown_customer_is_bad_request() {
        let server = get_test_server();

        let response = server
            .post("/api/transactions")
            .json(&new_transaction())
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn update_returns_no_content() {
        let server = get_seeded_server();

        let response = server
            .put("/api/transactions/TR-20250101-123458")
            .json(&new_transaction())
            .await;

        response.assert_status(StatusCode::NO_CONTENT);
        let updated: Value = server
            .get("/api/transactions/TR-20250101-123458")
            .await
            .json();
        assert_eq!(updated["amount"], json!(-12.5));
        assert_eq!(updated["date"], "2025-02-03");
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let server = get_seeded_server();

        server
            .put("/api/transactions/TR-MISSING")
            .json(&new_transaction())
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let server = get_seeded_server();

        server
            .delete("/api/transactions/TR-20250101-123459")
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get("/api/transactions/TR-20250101-123459")
            .await
            .assert_status_not_found();
        server
            .delete("/api/transactions/TR-20250101-123459")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn category_summary_totals_match_seed_data() {
        let server = get_seeded_server();

        let summaries: Vec<TransactionSummary> = server
            .get("/api/transactions/summary/category")
            .await
            .json();

        let total: rust_decimal::Decimal = summaries.iter().map(|s| s.total_amount).sum();
        assert_eq!(total, rust_decimal::Decimal::new(258850, 2));
        assert_eq!(summaries[0].category, "Salary");
    }

    #[tokio::test]
    async fn monthly_summary_rejects_out_of_range_year() {
        let server = get_seeded_server();

        let response = server.get("/api/transactions/summary/monthly/1800").await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "message": "Year must be between 1900 and 2100" }));
    }

    #[tokio::test]
    async fn monthly_summary_for_empty_year_is_empty() {
        let server = get_seeded_server();

        let summaries: Vec<TransactionSummary> = server
            .get("/api/transactions/summary/monthly/1950")
            .await
            .json();

        assert!(summaries.is_empty());
    }
}
