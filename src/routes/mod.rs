use axum::Router;

use crate::state::AppState;

pub mod collections;
pub mod dashboard;
pub mod doc;
pub mod health;
pub mod params;
pub mod products;
pub mod sales;
pub mod upload;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/collections", collections::router())
        .nest("/sales", sales::router())
        .nest("/dashboard", dashboard::router())
        .nest("/upload", upload::router())
}
