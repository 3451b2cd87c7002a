//! Subcategory creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    forms::form_page,
    notice::{Notice, NoticeAction, redirect_with_notice},
    resource::Resource,
    subcategory::{
        create_subcategory,
        form::{SubcategoryForm, category_options, subcategory_form_view},
    },
    validation::FieldErrors,
};

/// The state needed for creating a subcategory.
#[derive(Debug, Clone)]
pub struct CreateSubcategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateSubcategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the subcategory creation page.
pub async fn get_new_subcategory_page(
    State(state): State<CreateSubcategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let options = category_options(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;
    let form = subcategory_form_view(
        endpoints::NEW_SUBCATEGORY_VIEW,
        "Create Subcategory",
        &SubcategoryForm::default(),
        &options,
        &FieldErrors::new(),
    );

    Ok(form_page("Create Subcategory", endpoints::NEW_SUBCATEGORY_VIEW, &form).into_response())
}

/// Handle subcategory creation form submission.
pub async fn create_subcategory_endpoint(
    State(state): State<CreateSubcategoryState>,
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
        .and_then(|(name, category_id)| create_subcategory(name, category_id, &connection));

    let errors = match result {
        Ok(_) => {
            return redirect_with_notice(
                jar,
                endpoints::SUBCATEGORIES_VIEW,
                Notice::new(Resource::Subcategory, NoticeAction::Created),
            );
        }
        Err(error) => match error.into_field_errors() {
            Ok(errors) => errors,
            Err(error) => {
                tracing::error!(
                    "An unexpected error occurred while creating a subcategory: {error}"
                );
                return error.into_alert_response();
            }
        },
    };

    match category_options(&connection) {
        Ok(options) => subcategory_form_view(
            endpoints::NEW_SUBCATEGORY_VIEW,
            "Create Subcategory",
            &form,
            &options,
            &errors,
        )
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}


#[cfg(test)]
mod create_subcategory_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use axum_extra::extract::CookieJar;
    use scraper::Selector;

    use crate::{
        category::{Category, create_category},
        endpoints,
        subcategory::{create_subcategory, form::SubcategoryForm, get_subcategory},
        test_utils::{
            assert_field_error, assert_form_input, assert_hx_endpoint, assert_hx_redirect,
            assert_notice_cookie, assert_valid_html, create_type, get_test_connection,
            must_get_form, parse_html_document, parse_html_fragment,
        },
        validation::Name,
    };

    use super::{CreateSubcategoryState, create_subcategory_endpoint, get_new_subcategory_page};

    fn get_state() -> CreateSubcategoryState {
        CreateSubcategoryState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        }
    }

    fn insert_category(state: &CreateSubcategoryState) -> Category {
        let connection = state.db_connection.lock().unwrap();
        let expense = create_type(Name::new_unchecked("Expense"), &connection).unwrap();
        create_category(Name::new_unchecked("Food"), expense.id, &connection).unwrap()
    }

    fn form(name: &str, category_id: &str) -> Form<SubcategoryForm> {
        Form(SubcategoryForm {
            name: name.to_owned(),
            category_id: category_id.to_owned(),
        })
    }

    #[tokio::test]
    async fn new_subcategory_page_lists_categories_with_type() {
        let state = get_state();
        insert_category(&state);

        let response = get_new_subcategory_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::NEW_SUBCATEGORY_VIEW, "hx-post");
        assert_form_input(&form, "name", "text");
        let options = form
            .select(&Selector::parse("select[name=category] option").unwrap())
            .map(|option| option.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(options, ["---------", "Food (Expense)"]);
    }

    #[tokio::test]
    async fn can_create_subcategory() {
        let state = get_state();
        let category = insert_category(&state);

        let response = create_subcategory_endpoint(
            State(state.clone()),
            CookieJar::new(),
            form("Groceries", &category.id.to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SUBCATEGORIES_VIEW);
        assert_notice_cookie(&response, "subcategory:created");
        let subcategory = get_subcategory(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(subcategory.display_name(), "Groceries (Food (Expense))");
    }

    #[tokio::test]
    async fn missing_category_is_field_error() {
        let response =
            create_subcategory_endpoint(State(get_state()), CookieJar::new(), form("Groceries", ""))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_field_error(&form, "category", "This field is required.");
    }

    #[tokio::test]
    async fn duplicate_pair_is_non_field_error() {
        let state = get_state();
        let category = insert_category(&state);
        create_subcategory(
            Name::new_unchecked("Groceries"),
            category.id,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = create_subcategory_endpoint(
            State(state),
            CookieJar::new(),
            form("Groceries", &category.id.to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_field_error(
            &form,
            "non_field_errors",
            "Subcategory with this name and category already exists.",
        );
    }
}
