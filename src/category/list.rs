//! Categories listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    endpoints,
    html::{
        BADGE_STYLE, TABLE_CELL_STYLE, TABLE_ROW_STYLE, edit_delete_action_links, list_page,
        table_view,
    },
    notice::{Notice, take_notice},
};

/// The state needed for the categories listing page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the categories listing page, showing the type of each category.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let (jar, notice) = take_notice(jar);

    Ok((jar, categories_view(&categories, notice)).into_response())
}

fn categories_view(categories: &[Category], notice: Option<Notice>) -> Markup {
    let rows = html! {
        @for category in categories {
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (category.name) }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(BADGE_STYLE) { (category.type_name) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id),
                            &endpoints::format_endpoint(endpoints::DELETE_CATEGORY_VIEW, category.id),
                        ))
                    }
                }
            }
        }
    };

    list_page(
        "Categories",
        endpoints::CATEGORIES_VIEW,
        endpoints::NEW_CATEGORY_VIEW,
        "Create Category",
        notice,
        &table_view(
            &["Name", "Type", "Actions"],
            &rows,
            "No categories created yet.",
        ),
    )
}
