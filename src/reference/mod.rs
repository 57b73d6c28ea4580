//! Reference data: the genders, professions and categories that customers and
//! transactions refer to by ID.
//!
//! All three share one implementation, parameterised by [ReferenceEntity].

mod api;
mod db;
mod domain;
mod pages;
mod service;

pub use api::{create_endpoint, delete_endpoint, get_endpoint, list_endpoint, update_endpoint};
pub use db::{count as count_rows, create_reference_table, insert};
pub use domain::{Category, Gender, Profession, ReferenceEntity};
pub use pages::{
    create_reference_endpoint, delete_reference_endpoint, get_edit_reference_page,
    get_reference_page, update_reference_endpoint,
};
pub use service::list;
