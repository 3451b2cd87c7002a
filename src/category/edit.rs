//! Category editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use rusqlite::Connection;

use crate::{
    AppState, DatabaseId, Error,
    category::{
        form::{CategoryForm, category_form_view, type_options},
        get_category, update_category,
    },
    endpoints,
    forms::form_page,
    notice::{Notice, NoticeAction, redirect_with_notice},
    resource::Resource,
    validation::FieldErrors,
};

/// The state needed for editing a category.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category editing page.
pub async fn get_edit_category_page(
    Path(category_id): Path<DatabaseId>,
    State(state): State<EditCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = get_category(category_id, &connection)?;
    let options = type_options(&connection)?;
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id);
    let form = CategoryForm {
        name: category.name.to_string(),
        type_id: category.type_id.to_string(),
    };

    let form = category_form_view(
        &edit_endpoint,
        "Update Category",
        &form,
        &options,
        &FieldErrors::new(),
    );

    Ok(form_page("Edit Category", &edit_endpoint, &form).into_response())
}

/// Handle category update form submission.
pub async fn update_category_endpoint(
    Path(category_id): Path<DatabaseId>,
    State(state): State<EditCategoryState>,
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
        .and_then(|(name, type_id)| update_category(category_id, name, type_id, &connection));

    let errors = match result {
        Ok(_) => {
            return redirect_with_notice(
                jar,
                endpoints::CATEGORIES_VIEW,
                Notice::new(Resource::Category, NoticeAction::Updated),
            );
        }
        Err(error) => match error.into_field_errors() {
            Ok(errors) => errors,
            Err(error) => {
                tracing::error!("Could not update category {category_id}: {error}");
                return error.into_alert_response();
            }
        },
    };

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id);

    match type_options(&connection) {
        Ok(options) => {
            category_form_view(&edit_endpoint, "Update Category", &form, &options, &errors)
                .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod edit_category_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::CookieJar;
    use scraper::Selector;

    use crate::{
        Error,
        category::{Category, create_category, form::CategoryForm, get_category},
        endpoints,
        test_utils::{
            assert_field_error, assert_form_input_with_value, assert_hx_redirect,
            assert_notice_cookie, assert_valid_html, create_type, get_test_connection,
            must_get_form, parse_html_document, parse_html_fragment,
        },
        validation::Name,
    };

    use super::{EditCategoryState, get_edit_category_page, update_category_endpoint};

    fn get_state() -> EditCategoryState {
        EditCategoryState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        }
    }

    fn insert_category(state: &EditCategoryState) -> Category {
        let connection = state.db_connection.lock().unwrap();
        let expense = create_type(Name::new_unchecked("Expense"), &connection).unwrap();
        create_type(Name::new_unchecked("Income"), &connection).unwrap();
        create_category(Name::new_unchecked("Food"), expense.id, &connection).unwrap()
    }

    #[tokio::test]
    async fn edit_page_is_prefilled() {
        let state = get_state();
        let category = insert_category(&state);

        let response = get_edit_category_page(Path(category.id), State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "name", "text", "Food");
        let selected = form
            .select(&Selector::parse("select[name=type] option[selected]").unwrap())
            .map(|option| option.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(selected, ["Expense"]);
    }

    #[tokio::test]
    async fn edit_page_for_missing_category_is_not_found() {
        let result = get_edit_category_page(Path(999), State(get_state())).await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[tokio::test]
    async fn can_update_category() {
        let state = get_state();
        let category = insert_category(&state);
        let form = CategoryForm {
            name: "Salary".to_owned(),
            type_id: "2".to_owned(),
        };

        let response = update_category_endpoint(
            Path(category.id),
            State(state.clone()),
            CookieJar::new(),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
        assert_notice_cookie(&response, "category:updated");
        let updated = get_category(category.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(updated.display_name(), "Salary (Income)");
    }

    #[tokio::test]
    async fn empty_name_is_field_error() {
        let state = get_state();
        let category = insert_category(&state);
        let form = CategoryForm {
            name: " ".to_owned(),
            type_id: category.type_id.to_string(),
        };

        let response =
            update_category_endpoint(Path(category.id), State(state), CookieJar::new(), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_field_error(&form, "name", "Name cannot be empty.");
    }

    #[tokio::test]
    async fn update_missing_category_is_not_found() {
        let state = get_state();
        insert_category(&state);
        let form = CategoryForm {
            name: "Food".to_owned(),
            type_id: "1".to_owned(),
        };

        let response =
            update_category_endpoint(Path(999), State(state), CookieJar::new(), Form(form)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
