//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    error_page::{InternalServerError, NotFoundError},
    resource::Resource,
    validation::{FieldErrors, NON_FIELD_ERRORS},
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a name.
    #[error("Name cannot be empty.")]
    EmptyName,

    /// A name was longer than the allowed number of characters.
    #[error("Name cannot be longer than {0} characters.")]
    NameTooLong(usize),

    /// The submitted data failed validation.
    ///
    /// The field errors should be shown next to the fields of the originating
    /// form, or returned to API clients as-is.
    #[error("invalid input: {0}")]
    Validation(FieldErrors),

    /// A status or type with the same name, or a category or subcategory with
    /// the same name and parent, already exists.
    #[error("{}", .0.duplicate_message())]
    Duplicate(Resource),

    /// Tried to delete a row that cash flow records still refer to, either
    /// directly or through a child row that would be deleted with it.
    ///
    /// Nothing is deleted when this error is returned.
    #[error("cannot delete this {resource} because {count} cash flow record(s) use it")]
    ProtectedDelete {
        /// The kind of row that could not be deleted.
        resource: Resource,
        /// The number of cash flow records blocking the deletion.
        count: u32,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a row that does not exist.
    #[error("tried to update a {0} that is not in the database")]
    UpdateMissing(Resource),

    /// Tried to delete a row that does not exist.
    #[error("tried to delete a {0} that is not in the database")]
    DeleteMissing(Resource),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<FieldErrors> for Error {
    fn from(value: FieldErrors) -> Self {
        Error::Validation(value)
    }
}

impl Error {
    /// Convert user input errors into field errors, passing any other error through.
    ///
    /// Name errors are attached to the `name` field. Duplicates of statuses and
    /// types are attached to `name`, while duplicate (name, parent) pairs are
    /// reported as non-field errors since they involve two fields.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged if it is not caused by invalid user input.
    pub fn into_field_errors(self) -> Result<FieldErrors, Error> {
        match self {
            Error::Validation(errors) => Ok(errors),
            Error::EmptyName | Error::NameTooLong(_) => {
                Ok(FieldErrors::single("name", self.to_string()))
            }
            Error::Duplicate(resource @ (Resource::Status | Resource::Type)) => {
                Ok(FieldErrors::single("name", resource.duplicate_message()))
            }
            Error::Duplicate(resource) => Ok(FieldErrors::single(
                NON_FIELD_ERRORS,
                resource.duplicate_message(),
            )),
            error => Err(error),
        }
    }

    /// Render the error as an alert fragment for HTMX requests.
    pub fn into_alert_response(self) -> Response {
        match self {
            Error::ProtectedDelete { resource, count } => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: format!("Could not delete {resource}"),
                    details: format!(
                        "It is used by {count} cash flow record(s). \
                        Delete or edit those records first."
                    ),
                },
            )
                .into_response(),
            Error::UpdateMissing(resource) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: format!("Could not update {resource}"),
                    details: format!("The {resource} could not be found."),
                },
            )
                .into_response(),
            Error::DeleteMissing(resource) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: format!("Could not delete {resource}"),
                    details: format!(
                        "The {resource} could not be found. \
                        Try refreshing the page to see if it has already been deleted."
                    ),
                },
            )
                .into_response(),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::ErrorSimple {
                    message: "The requested resource could not be found".to_owned(),
                },
            )
                .into_response(),
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid input".to_owned(),
                    details: errors.to_string(),
                },
            )
                .into_response(),
            error @ (Error::EmptyName | Error::NameTooLong(_) | Error::Duplicate(_)) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: error.to_string(),
                },
            )
                .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                    },
                )
                    .into_response()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::UpdateMissing(_) | Error::DeleteMissing(_) => {
                NotFoundError.into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
