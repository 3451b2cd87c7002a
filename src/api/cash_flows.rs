use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    cash_flow::{
        CashFlow, CashFlowFilter, CashFlowForm, create_cash_flow, delete_cash_flow, get_cash_flow,
        query_cash_flows, update_cash_flow,
    },
    query::{parse_optional_date, split_search_terms},
    validation::parse_optional_id,
};

use super::{ApiError, ApiState, Payload, RecordId, field_text, lock_connection};

#[derive(Debug, Default, Deserialize)]
pub struct CashFlowListQuery {
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub date_created: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub type_id: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

impl CashFlowListQuery {
    fn filter(&self) -> CashFlowFilter {
        CashFlowFilter {
            status_id: parse_optional_id(self.status.as_deref()),
            type_id: parse_optional_id(self.type_id.as_deref()),
            category_id: parse_optional_id(self.category.as_deref()),
            subcategory_id: parse_optional_id(self.subcategory.as_deref()),
            date_created: parse_optional_date(self.date_created.as_deref()),
            ..Default::default()
        }
    }
}

/// Overlay the fields sent in `payload` onto `current`, or onto an empty
/// record when there is no current record.
///
/// The result goes through the same validation as the HTML form, except that
/// the date has no default.
fn merge_payload(payload: &Payload, current: Option<&CashFlow>) -> CashFlowForm {
    let mut form = current.map(CashFlowForm::from).unwrap_or_default();

    for (field, value) in [
        ("date_created", &mut form.date_created),
        ("status", &mut form.status),
        ("type", &mut form.type_id),
        ("category", &mut form.category),
        ("subcategory", &mut form.subcategory),
        ("amount", &mut form.amount),
        ("comment", &mut form.comment),
    ] {
        if let Some(text) = field_text(payload, field) {
            *value = text;
        }
    }

    form
}

/// List cash flow records, newest first unless `ordering` says otherwise.
pub async fn list(
    State(state): State<ApiState>,
    Query(query): Query<CashFlowListQuery>,
) -> Result<Json<Vec<CashFlow>>, ApiError> {
    let connection = lock_connection(&state.db_connection)?;
    let search_terms = split_search_terms(query.search.as_deref().unwrap_or_default());

    let cash_flows = query_cash_flows(
        &query.filter(),
        &search_terms,
        query.ordering.as_deref(),
        &connection,
    )?;

    Ok(Json(cash_flows))
}

pub async fn retrieve(
    RecordId(cash_flow_id): RecordId,
    State(state): State<ApiState>,
) -> Result<Json<CashFlow>, ApiError> {
    let connection = lock_connection(&state.db_connection)?;

    Ok(Json(get_cash_flow(cash_flow_id, &connection)?))
}

pub async fn create(
    State(state): State<ApiState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<(StatusCode, Json<CashFlow>), ApiError> {
    let Json(payload) = payload?;
    let cash_flow = merge_payload(&payload, None).validate(None)?;
    let connection = lock_connection(&state.db_connection)?;

    let cash_flow = create_cash_flow(cash_flow, &connection)?;

    Ok((StatusCode::CREATED, Json(cash_flow)))
}

pub async fn update(
    RecordId(cash_flow_id): RecordId,
    State(state): State<ApiState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<CashFlow>, ApiError> {
    let Json(payload) = payload?;
    let connection = lock_connection(&state.db_connection)?;
    get_cash_flow(cash_flow_id, &connection)?;

    let cash_flow = merge_payload(&payload, None).validate(None)?;

    Ok(Json(update_cash_flow(cash_flow_id, cash_flow, &connection)?))
}

pub async fn partial_update(
    RecordId(cash_flow_id): RecordId,
    State(state): State<ApiState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<CashFlow>, ApiError> {
    let Json(payload) = payload?;
    let connection = lock_connection(&state.db_connection)?;
    let current = get_cash_flow(cash_flow_id, &connection)?;

    let cash_flow = merge_payload(&payload, Some(&current)).validate(None)?;

    Ok(Json(update_cash_flow(cash_flow_id, cash_flow, &connection)?))
}

pub async fn destroy(
    RecordId(cash_flow_id): RecordId,
    State(state): State<ApiState>,
) -> Result<StatusCode, ApiError> {
    let connection = lock_connection(&state.db_connection)?;

    delete_cash_flow(cash_flow_id, &connection).inspect_err(|error| {
        tracing::warn!("Could not delete cash flow record {cash_flow_id}: {error}")
    })?;

    Ok(StatusCode::NO_CONTENT)
}
