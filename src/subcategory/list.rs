//! Subcategories listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BADGE_STYLE, TABLE_CELL_STYLE, TABLE_ROW_STYLE, edit_delete_action_links, list_page,
        table_view,
    },
    notice::{Notice, take_notice},
    subcategory::{Subcategory, get_all_subcategories},
};

/// The state needed for the subcategories listing page.
#[derive(Debug, Clone)]
pub struct SubcategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SubcategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the subcategories listing page, showing the category and type of each subcategory.
pub async fn get_subcategories_page(
    State(state): State<SubcategoriesPageState>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let subcategories = get_all_subcategories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve subcategories: {error}"))?;

    let (jar, notice) = take_notice(jar);

    Ok((jar, subcategories_view(&subcategories, notice)).into_response())
}

fn subcategories_view(subcategories: &[Subcategory], notice: Option<Notice>) -> Markup {
    let rows = html! {
        @for subcategory in subcategories {
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (subcategory.name) }

                td class=(TABLE_CELL_STYLE) { (subcategory.category_name) }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(BADGE_STYLE) { (subcategory.type_name) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &endpoints::format_endpoint(
                                endpoints::EDIT_SUBCATEGORY_VIEW,
                                subcategory.id,
                            ),
                            &endpoints::format_endpoint(
                                endpoints::DELETE_SUBCATEGORY_VIEW,
                                subcategory.id,
                            ),
                        ))
                    }
                }
            }
        }
    };

    list_page(
        "Subcategories",
        endpoints::SUBCATEGORIES_VIEW,
        endpoints::NEW_SUBCATEGORY_VIEW,
        "Create Subcategory",
        notice,
        &table_view(
            &["Name", "Category", "Type", "Actions"],
            &rows,
            "No subcategories created yet.",
        ),
    )
}


#[cfg(test)]
mod subcategories_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::CookieJar;
    use scraper::Selector;

    use crate::test_utils::{
        assert_valid_html, get_test_connection, insert_cash_flow_fixture, parse_html_document,
    };

    use super::{SubcategoriesPageState, get_subcategories_page};

    #[tokio::test]
    async fn lists_subcategories_with_category_and_type() {
        let state = SubcategoriesPageState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };
        insert_cash_flow_fixture(&state.db_connection.lock().unwrap());

        let response = get_subcategories_page(State(state), CookieJar::new())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let cells = html
            .select(&Selector::parse("tbody tr td").unwrap())
            .take(3)
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(cells, ["Groceries", "Food", "Expense"]);
    }
}
