//! Subcategory editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use rusqlite::Connection;

use crate::{
    AppState, DatabaseId, Error, endpoints,
    forms::form_page,
    notice::{Notice, NoticeAction, redirect_with_notice},
    resource::Resource,
    subcategory::{
        form::{SubcategoryForm, category_options, subcategory_form_view},
        get_subcategory, update_subcategory,
    },
    validation::FieldErrors,
};

/// The state needed for editing a subcategory.
#[derive(Debug, Clone)]
pub struct EditSubcategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditSubcategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the subcategory editing page.
pub async fn get_edit_subcategory_page(
    Path(subcategory_id): Path<DatabaseId>,
    State(state): State<EditSubcategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let subcategory = get_subcategory(subcategory_id, &connection)?;
    let options = category_options(&connection)?;
    let edit_endpoint =
        endpoints::format_endpoint(endpoints::EDIT_SUBCATEGORY_VIEW, subcategory_id);
    let form = SubcategoryForm {
        name: subcategory.name.to_string(),
        category_id: subcategory.category_id.to_string(),
    };

    let form = subcategory_form_view(
        &edit_endpoint,
        "Update Subcategory",
        &form,
        &options,
        &FieldErrors::new(),
    );

    Ok(form_page("Edit Subcategory", &edit_endpoint, &form).into_response())
}

/// Handle subcategory update form submission.
pub async fn update_subcategory_endpoint(
    Path(subcategory_id): Path<DatabaseId>,
    State(state): State<EditSubcategoryState>,
    jar: CookieJar,
    Form(form): Form<SubcategoryForm>,
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
        .and_then(|(name, category_id)| {
            update_subcategory(subcategory_id, name, category_id, &connection)
        });

    let errors = match result {
        Ok(_) => {
            return redirect_with_notice(
                jar,
                endpoints::SUBCATEGORIES_VIEW,
                Notice::new(Resource::Subcategory, NoticeAction::Updated),
            );
        }
        Err(error) => match error.into_field_errors() {
            Ok(errors) => errors,
            Err(error) => {
                tracing::error!("Could not update subcategory {subcategory_id}: {error}");
                return error.into_alert_response();
            }
        },
    };

    let edit_endpoint =
        endpoints::format_endpoint(endpoints::EDIT_SUBCATEGORY_VIEW, subcategory_id);

    match category_options(&connection) {
        Ok(options) => {
            subcategory_form_view(&edit_endpoint, "Update Subcategory", &form, &options, &errors)
                .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}
