//! The page shown when something goes wrong server-side.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// A 500 page with a short description of what happened and what to do next.
pub struct InternalServerError {
    pub description: &'static str,
    pub suggestion: &'static str,
}

impl Default for InternalServerError {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            suggestion: "Try again later or check the server logs",
        }
    }
}

impl InternalServerError {
    pub fn into_html(self) -> Html<String> {
        Html(
            error_view(
                "Internal Server Error",
                "500",
                self.description,
                self.suggestion,
            )
            .into_string(),
        )
    }
}

impl IntoResponse for InternalServerError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.into_html()).into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}
