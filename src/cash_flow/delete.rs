//! Cash flow record deletion confirmation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use rusqlite::Connection;

use crate::{
    AppState, DatabaseId, Error,
    cash_flow::{CashFlow, delete_cash_flow, get_cash_flow},
    endpoints,
    forms::delete_confirmation_page,
    notice::{Notice, NoticeAction, redirect_with_notice},
    resource::Resource,
};

/// The state needed for deleting a cash flow record.
#[derive(Debug, Clone)]
pub struct DeleteCashFlowState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCashFlowState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A one line summary of the record, e.g. "2024-01-10 - Expense - Food (Expense) - 12.34".
fn describe(cash_flow: &CashFlow) -> String {
    format!(
        "{} - {} - {} - {}",
        cash_flow.date_created, cash_flow.type_name, cash_flow.category_name, cash_flow.amount
    )
}

/// Render the page asking the user to confirm deleting a cash flow record.
pub async fn get_delete_cash_flow_page(
    Path(cash_flow_id): Path<DatabaseId>,
    State(state): State<DeleteCashFlowState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let cash_flow = get_cash_flow(cash_flow_id, &connection)?;
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_CASH_FLOW_VIEW, cash_flow_id);

    Ok(delete_confirmation_page(
        "Delete Record",
        &delete_url,
        endpoints::CASH_FLOWS_VIEW,
        &describe(&cash_flow),
        None,
    )
    .into_response())
}

/// Delete a cash flow record and redirect to the cash flow list.
pub async fn delete_cash_flow_endpoint(
    Path(cash_flow_id): Path<DatabaseId>,
    State(state): State<DeleteCashFlowState>,
    jar: CookieJar,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_cash_flow(cash_flow_id, &connection) {
        Ok(()) => redirect_with_notice(
            jar,
            endpoints::CASH_FLOWS_VIEW,
            Notice::new(Resource::CashFlow, NoticeAction::Deleted),
        ),
        Err(error @ Error::DeleteMissing(_)) => {
            tracing::warn!("Could not delete cash flow record {cash_flow_id}: {error}");
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting cash flow record {cash_flow_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_cash_flow_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::CookieJar;
    use scraper::Selector;

    use crate::{
        Error,
        cash_flow::get_cash_flow,
        endpoints,
        status::get_status,
        test_utils::{
            CashFlowFixture, assert_hx_redirect, assert_notice_cookie, assert_valid_html,
            get_test_connection, insert_cash_flow_fixture, parse_html_document,
        },
    };

    use super::{DeleteCashFlowState, delete_cash_flow_endpoint, get_delete_cash_flow_page};

    fn get_state() -> (DeleteCashFlowState, CashFlowFixture) {
        let connection = get_test_connection();
        let fixture = insert_cash_flow_fixture(&connection);
        let state = DeleteCashFlowState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, fixture)
    }

    #[tokio::test]
    async fn confirmation_page_describes_record() {
        let (state, fixture) = get_state();

        let response = get_delete_cash_flow_page(Path(fixture.cash_flow.id), State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let text = html
            .select(&Selector::parse("form").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert!(
            text.contains("2024-01-10 - Expense - Food (Expense) - 12.34"),
            "got {text}"
        );
    }

    #[tokio::test]
    async fn delete_cash_flow_endpoint_succeeds() {
        let (state, fixture) = get_state();

        let response = delete_cash_flow_endpoint(
            Path(fixture.cash_flow.id),
            State(state.clone()),
            CookieJar::new(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CASH_FLOWS_VIEW);
        assert_notice_cookie(&response, "cashflow:deleted");
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_cash_flow(fixture.cash_flow.id, &connection),
            Err(Error::NotFound)
        );
        // The referenced rows are left alone.
        assert!(get_status(fixture.status.id, &connection).is_ok());
    }

    #[tokio::test]
    async fn delete_missing_record_returns_not_found() {
        let (state, _) = get_state();

        let response = delete_cash_flow_endpoint(Path(999), State(state), CookieJar::new()).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
