use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::sales::{CheckoutRequest, ReceiptList, ReceiptWithSales, SaleList},
    error::AppResult,
    response::ApiResponse,
    routes::params::Pagination,
    services::sales_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales))
        .route("/checkout", post(checkout))
        .route("/receipt", get(list_receipts))
        .route("/receipt/{id}", get(get_receipt).delete(delete_receipt))
}

#[utoipa::path(
    get,
    path = "/api/sales",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Sales newest first, with product detail", body = ApiResponse<SaleList>)
    ),
    tag = "Sales"
)]
pub async fn list_sales(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<SaleList>>> {
    let resp = sales_service::list_sales(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sales/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Receipt with its sale lines", body = ApiResponse<ReceiptWithSales>),
        (status = 400, description = "Empty cart, invalid quantity or insufficient stock"),
    ),
    tag = "Sales"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<ReceiptWithSales>>> {
    let resp = sales_service::checkout(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sales/receipt",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Receipts newest first, with their sales", body = ApiResponse<ReceiptList>)
    ),
    tag = "Sales"
)]
pub async fn list_receipts(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ReceiptList>>> {
    let resp = sales_service::list_receipts(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sales/receipt/{id}",
    params(
        ("id" = Uuid, Path, description = "Receipt ID")
    ),
    responses(
        (status = 200, description = "Receipt with sales ordered by line", body = ApiResponse<ReceiptWithSales>),
        (status = 404, description = "Receipt not found"),
    ),
    tag = "Sales"
)]
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReceiptWithSales>>> {
    let resp = sales_service::get_receipt(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/sales/receipt/{id}",
    params(
        ("id" = Uuid, Path, description = "Receipt ID")
    ),
    responses(
        (status = 200, description = "Stock restored, sales and receipt deleted"),
        (status = 404, description = "Receipt not found"),
    ),
    tag = "Sales"
)]
pub async fn delete_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = sales_service::delete_receipt(&state, id).await?;
    Ok(Json(resp))
}
