//! Alerts for displaying success and error messages to users.
//!
//! Alerts are swapped out-of-band into the `#alert-container` element that
//! [crate::html::base] places at the bottom of every page.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

/// A message shown to the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message.
    SuccessSimple { message: String },
    /// An error message with details about what went wrong.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (is_success, message, details) = match self {
            Alert::SuccessSimple { message } => (true, message, String::new()),
            Alert::Error { message, details } => (false, message, details),
        };

        let container_style = if is_success {
            "flex items-start p-4 mb-4 rounded-lg border text-green-800 \
            border-green-300 bg-green-50 dark:bg-gray-800 dark:text-green-400 \
            dark:border-green-800"
        } else {
            "flex items-start p-4 mb-4 rounded-lg border text-red-800 \
            border-red-300 bg-red-50 dark:bg-gray-800 dark:text-red-400 \
            dark:border-red-800"
        };

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    role="alert"
                    class=(container_style)
                {
                    div class="flex-1"
                    {
                        p class="font-medium" { (message) }

                        @if !details.is_empty()
                        {
                            p class="mt-1 text-sm" { (details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-3 text-sm font-medium underline"
                        onclick="this.closest('[role=alert]').remove()"
                        aria-label="Dismiss"
                    {
                        "Dismiss"
                    }
                }
            }
        }
    }

    /// Render the alert as a response with the given status code.
    ///
    /// htmx only swaps content for 2xx responses by default, so successful
    /// deletes must use 200 OK for the table row to be removed.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, Html(self.into_html().into_string())).into_response()
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_response_with_status(StatusCode::OK)
    }
}
