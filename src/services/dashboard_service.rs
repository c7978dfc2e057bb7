use chrono::{Duration, NaiveTime, Utc};
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};

use crate::{
    dto::dashboard::{DashboardMetrics, SalesSummary},
    entity::products::{Column as ProdCol, Entity as Products},
    error::AppResult,
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

const POPULAR_PRODUCT_COUNT: u64 = 15;

pub async fn dashboard_metrics(state: &AppState) -> AppResult<ApiResponse<DashboardMetrics>> {
    let popular_products = Products::find()
        .order_by_desc(ProdCol::StockQuantity)
        .order_by_asc(ProdCol::Name)
        .limit(POPULAR_PRODUCT_COUNT)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let (all_time_total, all_time_receipts): (i64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(total), 0)::BIGINT, COUNT(*) FROM sales_receipts",
    )
    .fetch_one(&state.pool)
    .await?;

    // Half-open UTC calendar day: future-dated receipts do not count as today.
    let today_start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    let tomorrow_start = today_start + Duration::days(1);
    let (today_total, today_receipts): (i64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(total), 0)::BIGINT, COUNT(*) FROM sales_receipts \
         WHERE created_at >= $1 AND created_at < $2",
    )
    .bind(today_start)
    .bind(tomorrow_start)
    .fetch_one(&state.pool)
    .await?;

    let data = DashboardMetrics {
        popular_products,
        sales_summary: SalesSummary {
            today_total,
            today_receipts,
            all_time_total,
            all_time_receipts,
        },
    };

    Ok(ApiResponse::success("Dashboard", data, Some(Meta::empty())))
}
