//! Category creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        create_category,
        form::{CategoryForm, category_form_view, type_options},
    },
    endpoints,
    forms::form_page,
    notice::{Notice, NoticeAction, redirect_with_notice},
    resource::Resource,
    validation::FieldErrors,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category creation page.
pub async fn get_new_category_page(
    State(state): State<CreateCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let options = type_options(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve types: {error}"))?;
    let form = category_form_view(
        endpoints::NEW_CATEGORY_VIEW,
        "Create Category",
        &CategoryForm::default(),
        &options,
        &FieldErrors::new(),
    );

    Ok(form_page("Create Category", endpoints::NEW_CATEGORY_VIEW, &form).into_response())
}

/// Handle category creation form submission.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    jar: CookieJar,
    Form(form): Form<CategoryForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = form
        .validate()
        .map_err(Error::from)
        .and_then(|(name, type_id)| create_category(name, type_id, &connection));

    let errors = match result {
        Ok(_) => {
            return redirect_with_notice(
                jar,
                endpoints::CATEGORIES_VIEW,
                Notice::new(Resource::Category, NoticeAction::Created),
            );
        }
        Err(error) => match error.into_field_errors() {
            Ok(errors) => errors,
            Err(error) => {
                tracing::error!("An unexpected error occurred while creating a category: {error}");
                return error.into_alert_response();
            }
        },
    };

    match type_options(&connection) {
        Ok(options) => category_form_view(
            endpoints::NEW_CATEGORY_VIEW,
            "Create Category",
            &form,
            &options,
            &errors,
        )
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}
