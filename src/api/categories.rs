use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
    DatabaseId,
    category::{
        Category, create_category, delete_category, get_category, query_categories,
        update_category,
    },
    query::split_search_terms,
    validation::{FieldErrors, Name, parse_optional_id},
};

use super::{ApiError, ApiState, Payload, RecordId, id_field, lock_connection, name_field};

/// A category as returned by the API.
#[derive(Debug, Serialize)]
pub struct CategoryRepresentation {
    pub id: DatabaseId,
    pub name: Name,
    #[serde(rename = "type")]
    pub type_id: DatabaseId,
    pub type_name: String,
}

impl From<Category> for CategoryRepresentation {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            type_id: category.type_id,
            type_name: category.type_name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryListQuery {
    pub search: Option<String>,
    pub ordering: Option<String>,
    #[serde(rename = "type")]
    pub type_id: Option<String>,
}

fn read_fields(
    payload: &Payload,
    current: Option<&Category>,
) -> Result<(Name, DatabaseId), FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = name_field(payload, current.map(|category| &category.name), &mut errors);
    let type_id = id_field(
        payload,
        "type",
        current.map(|category| category.type_id),
        &mut errors,
    );

    match (name, type_id) {
        (Some(name), Some(type_id)) => Ok((name, type_id)),
        _ => Err(errors),
    }
}

/// List categories, optionally only those of one type.
pub async fn list(
    State(state): State<ApiState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<Vec<CategoryRepresentation>>, ApiError> {
    let connection = lock_connection(&state.db_connection)?;
    let search_terms = split_search_terms(query.search.as_deref().unwrap_or_default());

    let categories = query_categories(
        parse_optional_id(query.type_id.as_deref()),
        &search_terms,
        query.ordering.as_deref(),
        &connection,
    )?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

pub async fn retrieve(
    RecordId(category_id): RecordId,
    State(state): State<ApiState>,
) -> Result<Json<CategoryRepresentation>, ApiError> {
    let connection = lock_connection(&state.db_connection)?;

    Ok(Json(get_category(category_id, &connection)?.into()))
}

pub async fn create(
    State(state): State<ApiState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryRepresentation>), ApiError> {
    let Json(payload) = payload?;
    let (name, type_id) = read_fields(&payload, None)?;
    let connection = lock_connection(&state.db_connection)?;

    let category = create_category(name, type_id, &connection)?;

    Ok((StatusCode::CREATED, Json(category.into())))
}

pub async fn update(
    RecordId(category_id): RecordId,
    State(state): State<ApiState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<CategoryRepresentation>, ApiError> {
    let Json(payload) = payload?;
    let connection = lock_connection(&state.db_connection)?;
    get_category(category_id, &connection)?;

    let (name, type_id) = read_fields(&payload, None)?;

    Ok(Json(
        update_category(category_id, name, type_id, &connection)?.into(),
    ))
}

pub async fn partial_update(
    RecordId(category_id): RecordId,
    State(state): State<ApiState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<CategoryRepresentation>, ApiError> {
    let Json(payload) = payload?;
    let connection = lock_connection(&state.db_connection)?;
    let current = get_category(category_id, &connection)?;

    let (name, type_id) = read_fields(&payload, Some(&current))?;

    Ok(Json(
        update_category(category_id, name, type_id, &connection)?.into(),
    ))
}

/// Delete a category along with its subcategories.
pub async fn destroy(
    RecordId(category_id): RecordId,
    State(state): State<ApiState>,
) -> Result<StatusCode, ApiError> {
    let connection = lock_connection(&state.db_connection)?;

    delete_category(category_id, &connection).inspect_err(|error| {
        tracing::warn!("Could not delete category {category_id}: {error}")
    })?;

    Ok(StatusCode::NO_CONTENT)
}
