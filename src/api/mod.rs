//! A JSON REST API over the statuses, types, categories, subcategories and
//! cash flow records.
//!
//! Every collection supports list, retrieve, create (POST), update (PUT),
//! partial update (PATCH) and delete. Lists take a `search` string and an
//! `ordering` parameter alongside per-collection filters.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Router,
    extract::{FromRef, FromRequestParts, Path},
    http::request::Parts,
    routing::get,
};
use rusqlite::Connection;
use serde_json::{Map, Value};

use crate::{
    AppState, DatabaseId, Error, endpoints,
    flow_type::FlowType,
    status::Status,
    validation::{FieldErrors, Name, REQUIRED_MESSAGE, parse_required_id},
};

mod cash_flows;
mod categories;
mod error;
mod named_records;
mod subcategories;

pub use error::ApiError;

/// The state needed for the API handlers.
#[derive(Debug, Clone)]
pub struct ApiState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The routes of the REST API.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            endpoints::STATUSES_API,
            get(named_records::list::<Status>).post(named_records::create::<Status>),
        )
        .route(
            endpoints::STATUS_API,
            get(named_records::retrieve::<Status>)
                .put(named_records::update::<Status>)
                .patch(named_records::partial_update::<Status>)
                .delete(named_records::destroy::<Status>),
        )
        .route(
            endpoints::TYPES_API,
            get(named_records::list::<FlowType>).post(named_records::create::<FlowType>),
        )
        .route(
            endpoints::TYPE_API,
            get(named_records::retrieve::<FlowType>)
                .put(named_records::update::<FlowType>)
                .patch(named_records::partial_update::<FlowType>)
                .delete(named_records::destroy::<FlowType>),
        )
        .route(
            endpoints::CATEGORIES_API,
            get(categories::list).post(categories::create),
        )
        .route(
            endpoints::CATEGORY_API,
            get(categories::retrieve)
                .put(categories::update)
                .patch(categories::partial_update)
                .delete(categories::destroy),
        )
        .route(
            endpoints::SUBCATEGORIES_API,
            get(subcategories::list).post(subcategories::create),
        )
        .route(
            endpoints::SUBCATEGORY_API,
            get(subcategories::retrieve)
                .put(subcategories::update)
                .patch(subcategories::partial_update)
                .delete(subcategories::destroy),
        )
        .route(
            endpoints::CASH_FLOWS_API,
            get(cash_flows::list).post(cash_flows::create),
        )
        .route(
            endpoints::CASH_FLOW_API,
            get(cash_flows::retrieve)
                .put(cash_flows::update)
                .patch(cash_flows::partial_update)
                .delete(cash_flows::destroy),
        )
}

/// A JSON request body.
type Payload = Map<String, Value>;

/// The ID of the record named in the URL path.
///
/// An ID that is not an integer cannot name a record, so it is rejected with
/// the same JSON 404 as an unknown ID.
pub struct RecordId(DatabaseId);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<DatabaseId>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!("Invalid record ID in {}: {}", parts.uri, rejection.body_text());
                ApiError(Error::NotFound)
            })?;

        Ok(Self(id))
    }
}

fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, ApiError> {
    db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| ApiError(Error::DatabaseLockError))
}

/// The value of `field` as text, or `None` if the field was not sent.
///
/// `null` reads as an empty value and numbers as their decimal text.
fn field_text(payload: &Payload, field: &str) -> Option<String> {
    payload.get(field).map(|value| match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}

/// Read the `name` field, falling back to `current` when it was not sent.
///
/// With no `current` value (create and full update) a missing name is an error.
fn name_field(payload: &Payload, current: Option<&Name>, errors: &mut FieldErrors) -> Option<Name> {
    match field_text(payload, "name") {
        Some(raw) => Name::new(&raw)
            .map_err(|error| errors.add("name", error.to_string()))
            .ok(),
        None => current.cloned().or_else(|| {
            errors.add("name", REQUIRED_MESSAGE);
            None
        }),
    }
}

/// Read the foreign key `field`, falling back to `current` when it was not sent.
fn id_field(
    payload: &Payload,
    field: &str,
    current: Option<DatabaseId>,
    errors: &mut FieldErrors,
) -> Option<DatabaseId> {
    match field_text(payload, field) {
        Some(raw) => parse_required_id(&raw)
            .map_err(|message| errors.add(field, message))
            .ok(),
        None => current.or_else(|| {
            errors.add(field, REQUIRED_MESSAGE);
            None
        }),
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::sync::{Arc, Mutex};

    use axum_test::TestServer;

    use crate::{
        AppState,
        pagination::PaginationConfig,
        test_utils::{CashFlowFixture, get_test_connection, insert_cash_flow_fixture},
    };

    use super::api_routes;

    /// A server for the API routes backed by a database holding the cash flow fixture.
    pub(crate) fn get_test_server() -> (TestServer, CashFlowFixture) {
        let connection = get_test_connection();
        let fixture = insert_cash_flow_fixture(&connection);
        let state = AppState {
            local_timezone: "Etc/UTC".to_owned(),
            pagination_config: PaginationConfig::default(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let server =
            TestServer::try_new(api_routes().with_state(state)).expect("Could not create test server.");

        (server, fixture)
    }
}
