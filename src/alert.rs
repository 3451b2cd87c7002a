//! Alert messages shown to the user after an action succeeds or fails.
//!
//! Alerts are rendered as HTML fragments and swapped into the page's
//! `#alert-container` by HTMX, or embedded directly in a full page.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// An alert message, styled by whether it reports a success or an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    Success { message: String },
    Error { message: String, details: String },
    ErrorSimple { message: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (is_success, message, details) = match self {
            Alert::Success { message } => (true, message, String::new()),
            Alert::Error { message, details } => (false, message, details),
            Alert::ErrorSimple { message } => (false, message, String::new()),
        };

        let container_style = if is_success {
            "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg border \
            text-green-800 bg-green-50 border-green-300 \
            dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        } else {
            "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg border \
            text-red-800 bg-red-50 border-red-300 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        };

        html! {
            div
                class=(container_style)
                role="alert"
                data-alert=(if is_success { "success" } else { "error" })
            {
                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    class="ms-auto font-bold"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}
