//! Subcategory deletion confirmation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use rusqlite::Connection;

use crate::{
    AppState, DatabaseId, Error, endpoints,
    forms::delete_confirmation_page,
    notice::{Notice, NoticeAction, redirect_with_notice},
    resource::Resource,
    subcategory::{delete_subcategory, get_subcategory},
};

/// The state needed for deleting a subcategory.
#[derive(Debug, Clone)]
pub struct DeleteSubcategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteSubcategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page asking the user to confirm deleting a subcategory.
pub async fn get_delete_subcategory_page(
    Path(subcategory_id): Path<DatabaseId>,
    State(state): State<DeleteSubcategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let subcategory = get_subcategory(subcategory_id, &connection)?;
    let delete_url =
        endpoints::format_endpoint(endpoints::DELETE_SUBCATEGORY_VIEW, subcategory_id);

    Ok(delete_confirmation_page(
        "Delete Subcategory",
        &delete_url,
        endpoints::SUBCATEGORIES_VIEW,
        &subcategory.display_name(),
        None,
    )
    .into_response())
}

/// Delete a subcategory and redirect to the subcategories page.
pub async fn delete_subcategory_endpoint(
    Path(subcategory_id): Path<DatabaseId>,
    State(state): State<DeleteSubcategoryState>,
    jar: CookieJar,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_subcategory(subcategory_id, &connection) {
        Ok(()) => redirect_with_notice(
            jar,
            endpoints::SUBCATEGORIES_VIEW,
            Notice::new(Resource::Subcategory, NoticeAction::Deleted),
        ),
        Err(error @ (Error::ProtectedDelete { .. } | Error::DeleteMissing(_))) => {
            tracing::warn!("Could not delete subcategory {subcategory_id}: {error}");
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting subcategory {subcategory_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
