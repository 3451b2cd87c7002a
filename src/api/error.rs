//! JSON error responses for the REST API.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    Error,
    validation::{FieldErrors, NON_FIELD_ERRORS},
};

/// An [Error] rendered as JSON rather than as an HTML page.
///
/// - Invalid input: 400 with a map of field name to messages.
/// - Missing rows: 404 with `{"detail": "Not found."}`.
/// - Protected deletes: 409 with a `detail` message.
/// - Anything else: 500, with the details only written to the log.
#[derive(Debug, PartialEq)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self(Error::Validation(errors))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::Validation(FieldErrors::single(
            NON_FIELD_ERRORS,
            rejection.body_text(),
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::NotFound | Error::UpdateMissing(_) | Error::DeleteMissing(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "Not found." })),
            )
                .into_response(),
            error @ Error::ProtectedDelete { .. } => (
                StatusCode::CONFLICT,
                Json(json!({ "detail": error.to_string() })),
            )
                .into_response(),
            error => match error.into_field_errors() {
                Ok(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
                Err(error) => {
                    tracing::error!("An unexpected error occurred in the API: {error}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "detail": "A server error occurred." })),
                    )
                        .into_response()
                }
            },
        }
    }
}
