use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Serialize, ToSchema)]
pub struct SalesSummary {
    pub today_total: i64,
    pub today_receipts: i64,
    pub all_time_total: i64,
    pub all_time_receipts: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardMetrics {
    pub popular_products: Vec<Product>,
    pub sales_summary: SalesSummary,
}
