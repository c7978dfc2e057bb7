use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::collections::{CollectionList, CreateCollectionRequest, UpdateCollectionRequest},
    error::AppResult,
    models::Collection,
    response::ApiResponse,
    routes::params::CollectionListQuery,
    services::collection_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_collections).post(create_collection))
        .route(
            "/{id}",
            axum::routing::put(update_collection).delete(delete_collection),
        )
}

#[utoipa::path(
    get,
    path = "/api/collections",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive substring filter on name"),
    ),
    responses(
        (status = 200, description = "Collections with their products", body = ApiResponse<CollectionList>)
    ),
    tag = "Collections"
)]
pub async fn list_collections(
    State(state): State<AppState>,
    Query(query): Query<CollectionListQuery>,
) -> AppResult<Json<ApiResponse<CollectionList>>> {
    let resp = collection_service::list_collections(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/collections",
    request_body = CreateCollectionRequest,
    responses(
        (status = 200, description = "Create collection", body = ApiResponse<Collection>),
        (status = 400, description = "Validation failure"),
    ),
    tag = "Collections"
)]
pub async fn create_collection(
    State(state): State<AppState>,
    Json(payload): Json<CreateCollectionRequest>,
) -> AppResult<Json<ApiResponse<Collection>>> {
    let resp = collection_service::create_collection(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/collections/{id}",
    params(
        ("id" = Uuid, Path, description = "Collection ID")
    ),
    request_body = UpdateCollectionRequest,
    responses(
        (status = 200, description = "Updated collection", body = ApiResponse<Collection>),
        (status = 404, description = "Collection not found"),
    ),
    tag = "Collections"
)]
pub async fn update_collection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCollectionRequest>,
) -> AppResult<Json<ApiResponse<Collection>>> {
    let resp = collection_service::update_collection(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/collections/{id}",
    params(
        ("id" = Uuid, Path, description = "Collection ID")
    ),
    responses(
        (status = 200, description = "Deleted collection"),
        (status = 404, description = "Collection not found"),
        (status = 409, description = "Collection still has products"),
    ),
    tag = "Collections"
)]
pub async fn delete_collection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = collection_service::delete_collection(&state, id).await?;
    Ok(Json(resp))
}
