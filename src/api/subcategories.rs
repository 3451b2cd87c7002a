use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
    DatabaseId,
    query::split_search_terms,
    subcategory::{
        Subcategory, create_subcategory, delete_subcategory, get_subcategory,
        query_subcategories, update_subcategory,
    },
    validation::{FieldErrors, Name, parse_optional_id},
};

use super::{ApiError, ApiState, Payload, RecordId, id_field, lock_connection, name_field};

/// A subcategory as returned by the API.
///
/// `category_name` is the display name of the parent, e.g. "Food (Expense)".
#[derive(Debug, Serialize)]
pub struct SubcategoryRepresentation {
    pub id: DatabaseId,
    pub name: Name,
    pub category: DatabaseId,
    pub category_name: String,
}

impl From<Subcategory> for SubcategoryRepresentation {
    fn from(subcategory: Subcategory) -> Self {
        Self {
            category_name: subcategory.category_display_name(),
            id: subcategory.id,
            name: subcategory.name,
            category: subcategory.category_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SubcategoryListQuery {
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub category: Option<String>,
    /// The type of the parent category.
    #[serde(rename = "category__type")]
    pub category_type: Option<String>,
}

fn read_fields(
    payload: &Payload,
    current: Option<&Subcategory>,
) -> Result<(Name, DatabaseId), FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = name_field(
        payload,
        current.map(|subcategory| &subcategory.name),
        &mut errors,
    );
    let category_id = id_field(
        payload,
        "category",
        current.map(|subcategory| subcategory.category_id),
        &mut errors,
    );

    match (name, category_id) {
        (Some(name), Some(category_id)) => Ok((name, category_id)),
        _ => Err(errors),
    }
}

pub async fn list(
    State(state): State<ApiState>,
    Query(query): Query<SubcategoryListQuery>,
) -> Result<Json<Vec<SubcategoryRepresentation>>, ApiError> {
    let connection = lock_connection(&state.db_connection)?;
    let search_terms = split_search_terms(query.search.as_deref().unwrap_or_default());

    let subcategories = query_subcategories(
        parse_optional_id(query.category.as_deref()),
        parse_optional_id(query.category_type.as_deref()),
        &search_terms,
        query.ordering.as_deref(),
        &connection,
    )?;

    Ok(Json(subcategories.into_iter().map(Into::into).collect()))
}

pub async fn retrieve(
    RecordId(subcategory_id): RecordId,
    State(state): State<ApiState>,
) -> Result<Json<SubcategoryRepresentation>, ApiError> {
    let connection = lock_connection(&state.db_connection)?;

    Ok(Json(get_subcategory(subcategory_id, &connection)?.into()))
}

pub async fn create(
    State(state): State<ApiState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<(StatusCode, Json<SubcategoryRepresentation>), ApiError> {
    let Json(payload) = payload?;
    let (name, category_id) = read_fields(&payload, None)?;
    let connection = lock_connection(&state.db_connection)?;

    let subcategory = create_subcategory(name, category_id, &connection)?;

    Ok((StatusCode::CREATED, Json(subcategory.into())))
}

pub async fn update(
    RecordId(subcategory_id): RecordId,
    State(state): State<ApiState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<SubcategoryRepresentation>, ApiError> {
    let Json(payload) = payload?;
    let connection = lock_connection(&state.db_connection)?;
    get_subcategory(subcategory_id, &connection)?;

    let (name, category_id) = read_fields(&payload, None)?;

    Ok(Json(
        update_subcategory(subcategory_id, name, category_id, &connection)?.into(),
    ))
}

pub async fn partial_update(
    RecordId(subcategory_id): RecordId,
    State(state): State<ApiState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<SubcategoryRepresentation>, ApiError> {
    let Json(payload) = payload?;
    let connection = lock_connection(&state.db_connection)?;
    let current = get_subcategory(subcategory_id, &connection)?;

    let (name, category_id) = read_fields(&payload, Some(&current))?;

    Ok(Json(
        update_subcategory(subcategory_id, name, category_id, &connection)?.into(),
    ))
}

pub async fn destroy(
    RecordId(subcategory_id): RecordId,
    State(state): State<ApiState>,
) -> Result<StatusCode, ApiError> {
    let connection = lock_connection(&state.db_connection)?;

    delete_subcategory(subcategory_id, &connection).inspect_err(|error| {
        tracing::warn!("Could not delete subcategory {subcategory_id}: {error}")
    })?;

    Ok(StatusCode::NO_CONTENT)
}
