//! The `/api/statuses/` and `/api/types/` collections.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
    named_record::{NamedRecord, create_record, get_record, query_records, update_record},
    query::split_search_terms,
    validation::{FieldErrors, Name},
};

use super::{ApiError, ApiState, Payload, RecordId, lock_connection, name_field};

#[derive(Debug, Default, Deserialize)]
pub struct NameListQuery {
    pub search: Option<String>,
    pub ordering: Option<String>,
}

fn read_name<R: NamedRecord>(payload: &Payload, current: Option<&R>) -> Result<Name, FieldErrors> {
    let mut errors = FieldErrors::new();

    name_field(payload, current.map(|record| record.name()), &mut errors).ok_or(errors)
}

pub async fn list<R: NamedRecord + Serialize>(
    State(state): State<ApiState>,
    Query(query): Query<NameListQuery>,
) -> Result<Json<Vec<R>>, ApiError> {
    let connection = lock_connection(&state.db_connection)?;
    let search_terms = split_search_terms(query.search.as_deref().unwrap_or_default());

    let records = query_records::<R>(&search_terms, query.ordering.as_deref(), &connection)?;

    Ok(Json(records))
}

pub async fn retrieve<R: NamedRecord + Serialize>(
    RecordId(id): RecordId,
    State(state): State<ApiState>,
) -> Result<Json<R>, ApiError> {
    let connection = lock_connection(&state.db_connection)?;

    Ok(Json(get_record::<R>(id, &connection)?))
}

pub async fn create<R: NamedRecord + Serialize>(
    State(state): State<ApiState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let Json(payload) = payload?;
    let name = read_name::<R>(&payload, None)?;
    let connection = lock_connection(&state.db_connection)?;

    let record = create_record::<R>(name, &connection)?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update<R: NamedRecord + Serialize>(
    RecordId(id): RecordId,
    State(state): State<ApiState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<R>, ApiError> {
    let Json(payload) = payload?;
    let connection = lock_connection(&state.db_connection)?;
    get_record::<R>(id, &connection)?;

    let name = read_name::<R>(&payload, None)?;

    Ok(Json(update_record::<R>(id, name, &connection)?))
}

pub async fn partial_update<R: NamedRecord + Serialize>(
    RecordId(id): RecordId,
    State(state): State<ApiState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<R>, ApiError> {
    let Json(payload) = payload?;
    let connection = lock_connection(&state.db_connection)?;
    let current = get_record::<R>(id, &connection)?;

    let name = read_name(&payload, Some(&current))?;

    Ok(Json(update_record::<R>(id, name, &connection)?))
}

pub async fn destroy<R: NamedRecord>(
    RecordId(id): RecordId,
    State(state): State<ApiState>,
) -> Result<StatusCode, ApiError> {
    let connection = lock_connection(&state.db_connection)?;

    R::delete(id, &connection)
        .inspect_err(|error| tracing::warn!("Could not delete {} {id}: {error}", R::RESOURCE))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod status_api_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::api::test_server::get_test_server;

    fn names(body: Value) -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|record| record["name"].as_str().unwrap().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn create_then_list_by_name() {
        let (server, _) = get_test_server();

        let response = server
            .post("/api/statuses/")
            .json(&json!({ "name": "Personal" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        let created = response.json::<Value>();
        assert_eq!(created["name"], "Personal");

        let statuses = server.get("/api/statuses/").await.json::<Value>();
        assert_eq!(
            statuses,
            json!([
                { "id": 1, "name": "Business" },
                { "id": created["id"], "name": "Personal" },
            ])
        );
    }

    #[tokio::test]
    async fn duplicate_name_is_bad_request() {
        let (server, _) = get_test_server();

        let response = server
            .post("/api/statuses/")
            .json(&json!({ "name": "Business" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "name": ["Status with this name already exists."] })
        );
    }

    #[tokio::test]
    async fn missing_name_is_required() {
        let (server, _) = get_test_server();

        let response = server.post("/api/statuses/").json(&json!({})).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "name": ["This field is required."] })
        );
    }

    #[tokio::test]
    async fn search_and_ordering() {
        let (server, _) = get_test_server();
        for name in ["Tax", "Personal"] {
            server
                .post("/api/statuses/")
                .json(&json!({ "name": name }))
                .await;
        }

        let descending = server.get("/api/statuses/?ordering=-name").await.json::<Value>();
        assert_eq!(names(descending), ["Tax", "Personal", "Business"]);

        let searched = server.get("/api/statuses/?search=PERS").await.json::<Value>();
        assert_eq!(names(searched), ["Personal"]);
    }

    #[tokio::test]
    async fn patch_without_name_keeps_name() {
        let (server, fixture) = get_test_server();

        let response = server
            .patch(&format!("/api/statuses/{}/", fixture.status.id))
            .json(&json!({}))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["name"], "Business");
    }

    #[tokio::test]
    async fn put_renames_status() {
        let (server, fixture) = get_test_server();

        let response = server
            .put(&format!("/api/statuses/{}/", fixture.status.id))
            .json(&json!({ "name": "Work" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["name"], "Work");
    }

    #[tokio::test]
    async fn unknown_status_is_not_found() {
        let (server, _) = get_test_server();

        let response = server.get("/api/statuses/999/").await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>(), json!({ "detail": "Not found." }));

        let response = server
            .put("/api/statuses/999/")
            .json(&json!({ "name": "Work" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_status_id_is_not_found() {
        let (server, _) = get_test_server();

        for response in [
            server.get("/api/statuses/abc/").await,
            server.delete("/api/statuses/abc/").await,
            server
                .patch("/api/statuses/1.5/")
                .json(&json!({ "name": "Work" }))
                .await,
        ] {
            assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
            assert_eq!(response.json::<Value>(), json!({ "detail": "Not found." }));
        }
    }

    #[tokio::test]
    async fn deleting_status_in_use_is_conflict() {
        let (server, fixture) = get_test_server();

        let response = server
            .delete(&format!("/api/statuses/{}/", fixture.status.id))
            .await;

        assert_eq!(response.status_code(), StatusCode::CONFLICT);
        assert!(response.json::<Value>()["detail"].is_string());
    }

    #[tokio::test]
    async fn delete_unused_status() {
        let (server, _) = get_test_server();
        let created = server
            .post("/api/statuses/")
            .json(&json!({ "name": "Tax" }))
            .await
            .json::<Value>();
        let url = format!("/api/statuses/{}/", created["id"]);

        let response = server.delete(&url).await;

        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
        assert_eq!(server.get(&url).await.status_code(), StatusCode::NOT_FOUND);
    }
}
