//! Cash flow record editing page and endpoint.

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
    cash_flow::{
        form::{CashFlowForm, CashFlowFormOptions, cash_flow_form_page, cash_flow_form_view},
        get_cash_flow, update_cash_flow,
    },
    endpoints,
    notice::{Notice, NoticeAction, redirect_with_notice},
    resource::Resource,
    timezone::local_today,
    validation::FieldErrors,
};

/// The state needed for editing a cash flow record.
#[derive(Debug, Clone)]
pub struct EditCashFlowState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCashFlowState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the cash flow editing page.
///
/// The category and subcategory selects offer the children of the record's
/// current type and category.
pub async fn get_edit_cash_flow_page(
    Path(cash_flow_id): Path<DatabaseId>,
    State(state): State<EditCashFlowState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let cash_flow = get_cash_flow(cash_flow_id, &connection)?;
    let form = CashFlowForm::from(&cash_flow);
    let options = CashFlowFormOptions::load(&form, &connection)?;
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_CASH_FLOW_VIEW, cash_flow_id);

    let form = cash_flow_form_view(
        &edit_endpoint,
        "Update Record",
        &form,
        &options,
        &FieldErrors::new(),
    );

    Ok(cash_flow_form_page("Edit Record", &edit_endpoint, &form).into_response())
}

/// Handle cash flow update form submission.
pub async fn update_cash_flow_endpoint(
    Path(cash_flow_id): Path<DatabaseId>,
    State(state): State<EditCashFlowState>,
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
        .and_then(|cash_flow| update_cash_flow(cash_flow_id, cash_flow, &connection));

    let errors = match result {
        Ok(_) => {
            return redirect_with_notice(
                jar,
                endpoints::CASH_FLOWS_VIEW,
                Notice::new(Resource::CashFlow, NoticeAction::Updated),
            );
        }
        Err(error) => match error.into_field_errors() {
            Ok(errors) => errors,
            Err(error) => {
                tracing::error!("Could not update cash flow record {cash_flow_id}: {error}");
                return error.into_alert_response();
            }
        },
    };

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_CASH_FLOW_VIEW, cash_flow_id);

    match CashFlowFormOptions::load(&form, &connection) {
        Ok(options) => {
            cash_flow_form_view(&edit_endpoint, "Update Record", &form, &options, &errors)
                .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}
