#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod server;

pub(crate) use form::{
    Field, assert_input_value, assert_required_field, assert_selected_option,
    assert_submit_button, count_options, must_get_htmx_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, parse_html_text};
pub(crate) use server::{get_seeded_server, get_test_server};
