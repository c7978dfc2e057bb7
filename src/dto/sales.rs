use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Product, Sale, SalesReceipt};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_amount: Option<i64>,
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub cart: Vec<CartLine>,
    pub total: i64,
    pub remark: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReceiptWithSales {
    pub receipt: SalesReceipt,
    pub sales: Vec<Sale>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReceiptList {
    pub items: Vec<ReceiptWithSales>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleWithProduct {
    #[serde(flatten)]
    pub sale: Sale,
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleList {
    pub items: Vec<SaleWithProduct>,
}
