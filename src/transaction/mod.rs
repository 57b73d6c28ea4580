//! Transactions: the income and expenses recorded against customers, plus
//! the totals reported on the dashboard.
//!
//! This module contains:
//! - The transaction models, number generation and database queries
//! - The service shared by the JSON API and the pages
//! - Summaries grouped by category and by month
//! - The JSON handlers and the HTML pages

mod api;
mod core;
mod form;
mod pages;
mod service;
mod summary;

pub use api::{
    category_summary_endpoint, create_transaction_endpoint,
    delete_transaction_endpoint, get_transaction_endpoint, list_transactions_by_category_endpoint,
    list_transactions_by_customer_endpoint, list_transactions_by_date_range_endpoint,
    list_transactions_endpoint, monthly_summary_endpoint, update_transaction_endpoint,
};
pub use core::{
    Totals, TransactionDto, TransactionInput, count_transactions, create_transaction_table,
    get_recent_transactions, get_totals, insert_transaction,
};
pub use form::{
    create_transaction_form_endpoint, get_edit_transaction_page, get_new_transaction_page,
    update_transaction_form_endpoint,
};
pub use pages::{delete_transaction_form_endpoint, get_transactions_page};
pub use summary::{TransactionSummary, summarise_by_category, summarise_by_month};
