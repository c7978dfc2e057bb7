use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity;

/// Prices and totals are integer minor units (cents), never floats.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub product_image: Option<String>,
    pub price: i64,
    pub stock_quantity: i32,
    pub collection_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SalesReceipt {
    pub id: Uuid,
    pub receipt_number: String,
    pub total: i64,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One line item of a receipt. `unit_price` is captured at sale time and is
/// independent of the product's current price.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Sale {
    pub id: Uuid,
    pub receipt_id: Uuid,
    pub product_id: Uuid,
    pub line_no: i32,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_amount: i64,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::products::Model> for Product {
    fn from(model: entity::products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            sku: model.sku,
            product_image: model.product_image,
            price: model.price,
            stock_quantity: model.stock_quantity,
            collection_id: model.collection_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::collections::Model> for Collection {
    fn from(model: entity::collections::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::sales_receipts::Model> for SalesReceipt {
    fn from(model: entity::sales_receipts::Model) -> Self {
        Self {
            id: model.id,
            receipt_number: model.receipt_number,
            total: model.total,
            remark: model.remark,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::sales::Model> for Sale {
    fn from(model: entity::sales::Model) -> Self {
        Self {
            id: model.id,
            receipt_id: model.receipt_id,
            product_id: model.product_id,
            line_no: model.line_no,
            quantity: model.quantity,
            unit_price: model.unit_price,
            total_amount: model.total_amount,
            remark: model.remark,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
