//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/customers/{customer_id}', use [format_endpoint].

use std::fmt::Display;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// The characters that must be escaped in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page with summary cards, charts and recent transactions.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for listing and filtering transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{trans_num}/edit";
/// The form route for updating or deleting a transaction.
pub const TRANSACTION_VIEW: &str = "/transactions/{trans_num}";
/// The page for listing and searching customers.
pub const CUSTOMERS_VIEW: &str = "/customers";
/// The page for creating a new customer.
pub const NEW_CUSTOMER_VIEW: &str = "/customers/new";
/// The page for editing an existing customer.
pub const EDIT_CUSTOMER_VIEW: &str = "/customers/{customer_id}/edit";
/// The form route for updating or deleting a customer.
pub const CUSTOMER_VIEW: &str = "/customers/{customer_id}";
/// The page for listing genders.
pub const GENDERS_VIEW: &str = "/genders";
/// The page for editing a gender.
pub const EDIT_GENDER_VIEW: &str = "/genders/{id}/edit";
/// The form route for updating or deleting a gender.
pub const GENDER_VIEW: &str = "/genders/{id}";
/// The page for listing professions.
pub const PROFESSIONS_VIEW: &str = "/professions";
/// The page for editing a profession.
pub const EDIT_PROFESSION_VIEW: &str = "/professions/{id}/edit";
/// The form route for updating or deleting a profession.
pub const PROFESSION_VIEW: &str = "/professions/{id}";
/// The page for listing categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for editing a category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{id}/edit";
/// The form route for updating or deleting a category.
pub const CATEGORY_VIEW: &str = "/categories/{id}";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route to access customers.
pub const CUSTOMERS_API: &str = "/api/customers";
/// The route to access a single customer.
pub const CUSTOMER_API: &str = "/api/customers/{customer_id}";
/// The route to access transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION_API: &str = "/api/transactions/{trans_num}";
/// The route for the transactions of one customer.
pub const TRANSACTIONS_BY_CUSTOMER_API: &str = "/api/transactions/customer/{customer_id}";
/// The route for the transactions in one category.
pub const TRANSACTIONS_BY_CATEGORY_API: &str = "/api/transactions/category/{category_id}";
/// The route for the transactions between two dates, both inclusive.
pub const TRANSACTIONS_BY_DATE_RANGE_API: &str = "/api/transactions/daterange";
/// The route for transaction totals grouped by category.
pub const CATEGORY_SUMMARY_API: &str = "/api/transactions/summary/category";
/// The route for transaction totals grouped by month for one year.
pub const MONTHLY_SUMMARY_API: &str = "/api/transactions/summary/monthly/{year}";
/// The route to access genders.
pub const GENDERS_API: &str = "/api/genders";
/// The route to access a single gender.
pub const GENDER_API: &str = "/api/genders/{id}";
/// The route to access professions.
pub const PROFESSIONS_API: &str = "/api/professions";
/// The route to access a single profession.
pub const PROFESSION_API: &str = "/api/professions/{id}";
/// The route to access categories.
pub const CATEGORIES_API: &str = "/api/categories";
/// The route to access a single category.
pub const CATEGORY_API: &str = "/api/categories/{id}";

/// Replace the parameter in `endpoint_path` with `id`, percent-encoded as a
/// path segment.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/customers/{customer_id}', '{customer_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, it is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        utf8_percent_encode(&id.to_string(), PATH_SEGMENT),
        &endpoint_path[param_end..]
    )
}
