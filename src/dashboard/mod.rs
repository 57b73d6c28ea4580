//! Dashboard module
//!
//! Provides an overview page with the transaction totals, charts of spending
//! by category and by month, and the most recent transactions.

mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
