//! Customers, their demographic details and derived fields such as age.

mod api;
mod db;
mod domain;
mod pages;
mod service;

pub use api::{
    create_customer_endpoint, delete_customer_endpoint, get_customer_endpoint,
    list_customers_endpoint, update_customer_endpoint,
};
pub use db::{count as count_customers, create_customer_table};
pub use domain::{CustomerDto, CustomerInput};
pub use pages::{
    create_customer_form_endpoint, delete_customer_form_endpoint, get_customers_page,
    get_edit_customer_page, get_new_customer_page, update_customer_form_endpoint,
};
pub use service::{create as create_customer, list_all as list_customers};
