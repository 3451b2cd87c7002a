//! Cash flow record creation page and endpoint.

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
    cash_flow::{
        create_cash_flow,
        form::{CashFlowForm, CashFlowFormOptions, cash_flow_form_page, cash_flow_form_view},
    },
    endpoints,
    notice::{Notice, NoticeAction, redirect_with_notice},
    resource::Resource,
    timezone::local_today,
    validation::FieldErrors,
};

/// The state needed for creating a cash flow record.
#[derive(Debug, Clone)]
pub struct CreateCashFlowState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCashFlowState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the cash flow creation page with the date set to today.
pub async fn get_new_cash_flow_page(
    State(state): State<CreateCashFlowState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .inspect_err(|error| tracing::error!("Could not get local date: {error}"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let form = CashFlowForm::new(today);
    let options = CashFlowFormOptions::load(&form, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve form options: {error}"))?;
    let form = cash_flow_form_view(
        endpoints::NEW_CASH_FLOW_VIEW,
        "Create Record",
        &form,
        &options,
        &FieldErrors::new(),
    );

    Ok(cash_flow_form_page("Create Record", endpoints::NEW_CASH_FLOW_VIEW, &form).into_response())
}

/// Handle cash flow creation form submission.
pub async fn create_cash_flow_endpoint(
    State(state): State<CreateCashFlowState>,
    jar: CookieJar,
    Form(form): Form<CashFlowForm>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("Could not get local date: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = form
        .validate(Some(today))
        .map_err(Error::from)
        .and_then(|cash_flow| create_cash_flow(cash_flow, &connection));

    let errors = match result {
        Ok(_) => {
            return redirect_with_notice(
                jar,
                endpoints::CASH_FLOWS_VIEW,
                Notice::new(Resource::CashFlow, NoticeAction::Created),
            );
        }
        Err(error) => match error.into_field_errors() {
            Ok(errors) => errors,
            Err(error) => {
                tracing::error!(
                    "An unexpected error occurred while creating a cash flow record: {error}"
                );
                return error.into_alert_response();
            }
        },
    };

    match CashFlowFormOptions::load(&form, &connection) {
        Ok(options) => cash_flow_form_view(
            endpoints::NEW_CASH_FLOW_VIEW,
            "Create Record",
            &form,
            &options,
            &errors,
        )
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod create_cash_flow_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use axum_extra::extract::CookieJar;
    use scraper::Selector;

    use crate::{
        cash_flow::{CashFlowFilter, count_cash_flows, form::CashFlowForm},
        endpoints,
        test_utils::{
            CashFlowFixture, assert_field_error, assert_form_input, assert_hx_endpoint,
            assert_hx_redirect, assert_notice_cookie, assert_select_options, assert_valid_html,
            create_type, get_test_connection, insert_cash_flow_fixture, must_get_form,
            parse_html_document, parse_html_fragment,
        },
        timezone::local_today,
        validation::Name,
    };

    use super::{CreateCashFlowState, create_cash_flow_endpoint, get_new_cash_flow_page};

    fn get_state() -> (CreateCashFlowState, CashFlowFixture) {
        let connection = get_test_connection();
        let fixture = insert_cash_flow_fixture(&connection);
        let state = CreateCashFlowState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, fixture)
    }

    fn valid_form(fixture: &CashFlowFixture) -> CashFlowForm {
        CashFlowForm {
            date_created: "2024-05-01".to_owned(),
            status: fixture.status.id.to_string(),
            type_id: fixture.flow_type.id.to_string(),
            category: fixture.category.id.to_string(),
            subcategory: fixture.subcategory.id.to_string(),
            amount: "99.95".to_owned(),
            comment: "Dinner".to_owned(),
        }
    }

    #[tokio::test]
    async fn new_page_defaults_date_to_today_and_leaves_categories_empty() {
        let (state, _) = get_state();

        let response = get_new_cash_flow_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::NEW_CASH_FLOW_VIEW, "hx-post");
        assert_form_input(&form, "amount", "number");
        let today = local_today("Etc/UTC").unwrap().to_string();
        let date = form
            .select(&Selector::parse("input[name=date_created]").unwrap())
            .next()
            .unwrap();
        assert_eq!(date.value().attr("value"), Some(today.as_str()));
        assert_select_options(&form, "type", &["---------", "Expense"]);
        assert_select_options(&form, "category", &["---------"]);
        assert_select_options(&form, "subcategory", &["---------"]);
        let script = Selector::parse("script[src='/static/dependent_dropdowns.js']").unwrap();
        assert_eq!(html.select(&script).count(), 1);
    }

    #[tokio::test]
    async fn can_create_cash_flow() {
        let (state, fixture) = get_state();

        let response = create_cash_flow_endpoint(
            State(state.clone()),
            CookieJar::new(),
            Form(valid_form(&fixture)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CASH_FLOWS_VIEW);
        assert_notice_cookie(&response, "cashflow:created");
        let count = count_cash_flows(
            &CashFlowFilter::default(),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn invalid_amount_is_field_error() {
        let (state, fixture) = get_state();
        let form = CashFlowForm {
            amount: "100.005".to_owned(),
            ..valid_form(&fixture)
        };

        let response = create_cash_flow_endpoint(State(state), CookieJar::new(), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_field_error(
            &form,
            "amount",
            "Ensure that there are no more than 2 decimal places.",
        );
    }

    #[tokio::test]
    async fn category_of_another_type_is_field_error() {
        let (state, fixture) = get_state();
        let income = create_type(
            Name::new_unchecked("Income"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        let form = CashFlowForm {
            type_id: income.id.to_string(),
            ..valid_form(&fixture)
        };

        let response = create_cash_flow_endpoint(State(state), CookieJar::new(), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_field_error(
            &form,
            "category",
            "The selected category does not belong to the selected type.",
        );
        // The re-rendered form only offers the categories of the submitted type.
        assert_select_options(&form, "category", &["---------"]);
    }
}
