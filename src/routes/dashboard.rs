use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::DashboardMetrics, error::AppResult, response::ApiResponse,
    services::dashboard_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard_metrics))
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Popular products and sales summary", body = ApiResponse<DashboardMetrics>)
    ),
    tag = "Dashboard"
)]
pub async fn dashboard_metrics(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DashboardMetrics>>> {
    let resp = dashboard_service::dashboard_metrics(&state).await?;
    Ok(Json(resp))
}
