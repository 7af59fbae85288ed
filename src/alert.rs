//! Alert system for displaying success and error messages to users.
//!
//! Alerts render as htmx fragments that are swapped into the `#alert-container`
//! element defined in [crate::html::base].

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A dismissible alert box shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success alert with a headline and supporting text.
    Success {
        /// The alert headline.
        message: String,
        /// The supporting text shown under the headline.
        details: String,
    },
    /// A success alert with a headline only.
    SuccessSimple {
        /// The alert headline.
        message: String,
    },
    /// An error alert with a headline and supporting text.
    Error {
        /// The alert headline.
        message: String,
        /// The supporting text shown under the headline.
        details: String,
    },
    /// An error alert with a headline only.
    ErrorSimple {
        /// The alert headline.
        message: String,
    },
}

const SUCCESS_ALERT_STYLE: &str = "flex items-start gap-3 p-4 mb-4 rounded-lg border \
    text-green-800 border-green-300 bg-green-50 dark:bg-gray-800 \
    dark:text-green-400 dark:border-green-800";

const ERROR_ALERT_STYLE: &str = "flex items-start gap-3 p-4 mb-4 rounded-lg border \
    text-red-800 border-red-300 bg-red-50 dark:bg-gray-800 \
    dark:text-red-400 dark:border-red-800";

const DISMISS_BUTTON_STYLE: &str = "ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 \
    inline-flex items-center justify-center h-8 w-8 bg-transparent \
    hover:bg-gray-200 dark:hover:bg-gray-700 cursor-pointer";

impl Alert {
    /// Render the alert as an out-of-band swap targeting `#alert-container`.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Success { message, details } => (SUCCESS_ALERT_STYLE, message, Some(details)),
            Alert::SuccessSimple { message } => (SUCCESS_ALERT_STYLE, message, None),
            Alert::Error { message, details } => (ERROR_ALERT_STYLE, message, Some(details)),
            Alert::ErrorSimple { message } => (ERROR_ALERT_STYLE, message, None),
        };

        html! {
            div
                id="alert-container"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                hx-swap-oob="true"
            {
                div class=(style) role="alert"
                {
                    div
                    {
                        p class="font-medium" { (message) }

                        @if let Some(details) = details
                        {
                            p class="mt-1 text-sm" { (details) }
                        }
                    }

                    button
                        type="button"
                        class=(DISMISS_BUTTON_STYLE)
                        aria-label="Close"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        span aria-hidden="true" { "\u{00d7}" }
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
