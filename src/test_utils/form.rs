//! Assertions over the htmx forms rendered by the create and edit pages.

use scraper::{ElementRef, Html, Selector};

/// The kind of control expected for a form field.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Field<'a> {
    /// An `<input>` with the given `type`.
    Input(&'a str),
    Select,
}

/// Get the form that submits to `endpoint` with `hx_attribute`, e.g. "hx-put".
#[track_caller]
pub(crate) fn must_get_htmx_form<'a>(
    html: &'a Html,
    hx_attribute: &str,
    endpoint: &str,
) -> ElementRef<'a> {
    let selector = Selector::parse(&format!("form[{hx_attribute}]")).unwrap();
    let forms: Vec<ElementRef<'a>> = html.select(&selector).collect();

    forms
        .iter()
        .find(|form| form.value().attr(hx_attribute) == Some(endpoint))
        .copied()
        .unwrap_or_else(|| {
            let found: Vec<&str> = forms
                .iter()
                .filter_map(|form| form.value().attr(hx_attribute))
                .collect();
            panic!("want form with {hx_attribute}=\"{endpoint}\", found {found:?}")
        })
}

#[track_caller]
fn must_get_field<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    form.select(&Selector::parse(&format!("[name=\"{name}\"]")).unwrap())
        .next()
        .unwrap_or_else(|| panic!("No field found with name \"{name}\""))
}

/// Assert that `form` has a required field `name` rendered as `field`.
#[track_caller]
pub(crate) fn assert_required_field(form: &ElementRef<'_>, name: &str, field: Field<'_>) {
    let element = must_get_field(form, name);
    let tag = element.value().name();

    match field {
        Field::Input(type_) => {
            assert_eq!(tag, "input", "want field {name} to be an input, got <{tag}>");
            let got = element.value().attr("type").unwrap_or_default();
            assert_eq!(got, type_, "want input {name} with type \"{type_}\", got {got:?}");
        }
        Field::Select => {
            assert_eq!(tag, "select", "want field {name} to be a select, got <{tag}>");
        }
    }

    assert!(
        element.value().attr("required").is_some(),
        "want field {name} to have the required attribute but got none"
    );
}

/// Assert that the input `name` is prefilled with `value`.
#[track_caller]
pub(crate) fn assert_input_value(form: &ElementRef<'_>, name: &str, value: &str) {
    let element = must_get_field(form, name);
    let got = element.value().attr("value").unwrap_or_default();

    assert_eq!(got, value, "want input {name} with value \"{value}\", got {got:?}");
}

/// Assert that the select `name` has the option labelled `label` selected.
#[track_caller]
pub(crate) fn assert_selected_option(form: &ElementRef<'_>, name: &str, label: &str) {
    let select = must_get_field(form, name);
    let selected: Vec<String> = select
        .select(&Selector::parse("option[selected]").unwrap())
        .map(|option| option.text().collect::<String>().trim().to_owned())
        .collect();

    assert_eq!(selected, [label], "want select {name} to have \"{label}\" selected");
}

/// Count the options of the select `name`, including any placeholder.
#[track_caller]
pub(crate) fn count_options(form: &ElementRef<'_>, name: &str) -> usize {
    must_get_field(form, name)
        .select(&Selector::parse("option").unwrap())
        .count()
}

/// Assert that `form` has a submit button labelled `label`.
#[track_caller]
pub(crate) fn assert_submit_button(form: &ElementRef<'_>, label: &str) {
    let found = form
        .select(&Selector::parse("button[type=submit]").unwrap())
        .any(|button| button.text().collect::<String>().trim() == label);

    assert!(found, "want submit button labelled \"{label}\"");
}
