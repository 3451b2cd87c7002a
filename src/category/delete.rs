//! Category deletion confirmation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use rusqlite::Connection;

use crate::{
    AppState, DatabaseId, Error,
    category::{count_subcategories, delete_category, get_category},
    endpoints,
    forms::delete_confirmation_page,
    notice::{Notice, NoticeAction, redirect_with_notice},
    resource::Resource,
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page asking the user to confirm deleting a category.
pub async fn get_delete_category_page(
    Path(category_id): Path<DatabaseId>,
    State(state): State<DeleteCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = get_category(category_id, &connection)?;
    let subcategory_count = count_subcategories(category_id, &connection)?;
    let warning = (subcategory_count > 0)
        .then(|| format!("This will also delete {subcategory_count} subcategories."));
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_CATEGORY_VIEW, category_id);

    Ok(delete_confirmation_page(
        "Delete Category",
        &delete_url,
        endpoints::CATEGORIES_VIEW,
        &category.display_name(),
        warning.as_deref(),
    )
    .into_response())
}

/// Delete a category and its subcategories, then redirect to the categories page.
pub async fn delete_category_endpoint(
    Path(category_id): Path<DatabaseId>,
    State(state): State<DeleteCategoryState>,
    jar: CookieJar,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_category(category_id, &connection) {
        Ok(()) => redirect_with_notice(
            jar,
            endpoints::CATEGORIES_VIEW,
            Notice::new(Resource::Category, NoticeAction::Deleted),
        ),
        Err(error @ (Error::ProtectedDelete { .. } | Error::DeleteMissing(_))) => {
            tracing::warn!("Could not delete category {category_id}: {error}");
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
