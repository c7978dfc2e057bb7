use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::sales::{
        CartLine, CheckoutRequest, ReceiptList, ReceiptWithSales, SaleList, SaleWithProduct,
    },
    entity::{
        products::{Column as ProdCol, Entity as Products},
        sales::{ActiveModel as SaleActive, Column as SaleCol, Entity as Sales},
        sales_receipts::{
            ActiveModel as ReceiptActive, Column as ReceiptCol, Entity as SalesReceipts,
        },
    },
    error::{AppError, AppResult},
    models::{Product, Sale},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Checkout: one receipt, one sale row per cart line, one guarded stock
/// decrement per distinct product, all inside a single transaction.
pub async fn checkout(
    state: &AppState,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<ReceiptWithSales>> {
    if payload.cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    for line in &payload.cart {
        if line.quantity <= 0 {
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }
    }

    let requested = sum_quantities_per_product(&payload.cart);

    let txn = state.orm.begin().await?;

    let product_ids: Vec<Uuid> = requested.keys().copied().collect();
    let locked = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .lock(LockType::Update)
        .all(&txn)
        .await?;
    // Stock widens to i64 so a cart whose lines sum past i32 cannot pass.
    let stock_by_id: HashMap<Uuid, i64> = locked
        .iter()
        .map(|p| (p.id, i64::from(p.stock_quantity)))
        .collect();

    for (product_id, quantity) in &requested {
        match stock_by_id.get(product_id) {
            None => {
                return Err(AppError::BadRequest(format!(
                    "Product {product_id} not found"
                )));
            }
            Some(stock) if stock < quantity => {
                return Err(AppError::BadRequest(format!(
                    "Insufficient stock for product {product_id}"
                )));
            }
            _ => {}
        }
    }

    let receipt_id = Uuid::new_v4();
    let receipt = ReceiptActive {
        id: Set(receipt_id),
        receipt_number: Set(build_receipt_number(receipt_id)),
        total: Set(payload.total),
        remark: Set(payload.remark.clone()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut sales: Vec<Sale> = Vec::with_capacity(payload.cart.len());
    for (idx, line) in payload.cart.iter().enumerate() {
        let total_amount = match line.total_amount {
            Some(total) => total,
            None => line
                .unit_price
                .checked_mul(i64::from(line.quantity))
                .ok_or_else(|| AppError::BadRequest("Cart has invalid amount".into()))?,
        };
        let sale = SaleActive {
            id: Set(Uuid::new_v4()),
            receipt_id: Set(receipt.id),
            product_id: Set(line.product_id),
            line_no: Set((idx + 1) as i32),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            total_amount: Set(total_amount),
            remark: Set(line.remark.clone()),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        sales.push(sale.into());
    }

    // One decrement per product even when the cart repeats it.
    for (product_id, quantity) in &requested {
        Products::update_many()
            .col_expr(
                ProdCol::StockQuantity,
                Expr::col(ProdCol::StockQuantity).sub(*quantity),
            )
            .filter(ProdCol::Id.eq(*product_id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        "checkout",
        Some("sales"),
        Some(serde_json::json!({ "receipt_id": receipt.id, "lines": sales.len() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Checkout successful",
        ReceiptWithSales {
            receipt: receipt.into(),
            sales,
        },
        Some(Meta::empty()),
    ))
}

/// Reversal: restore stock from the sale rows, then delete the sales and the
/// receipt. Restoration must run before the deletes because it reads the
/// quantities from the rows being deleted.
pub async fn delete_receipt(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;

    let receipt = SalesReceipts::find()
        .filter(ReceiptCol::Id.eq(id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    if receipt.is_none() {
        return Err(AppError::NotFound);
    }

    let sales = Sales::find()
        .filter(SaleCol::ReceiptId.eq(id))
        .all(&txn)
        .await?;

    let mut restored: BTreeMap<Uuid, i32> = BTreeMap::new();
    for sale in &sales {
        *restored.entry(sale.product_id).or_insert(0) += sale.quantity;
    }
    for (product_id, quantity) in &restored {
        Products::update_many()
            .col_expr(
                ProdCol::StockQuantity,
                Expr::col(ProdCol::StockQuantity).add(*quantity),
            )
            .filter(ProdCol::Id.eq(*product_id))
            .exec(&txn)
            .await?;
    }

    Sales::delete_many()
        .filter(SaleCol::ReceiptId.eq(id))
        .exec(&txn)
        .await?;
    SalesReceipts::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        "receipt_delete",
        Some("sales"),
        Some(serde_json::json!({ "receipt_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Receipt and sales deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

#[derive(FromRow)]
struct SaleWithProductRow {
    sale_id: Uuid,
    receipt_id: Uuid,
    line_no: i32,
    quantity: i32,
    unit_price: i64,
    total_amount: i64,
    sale_remark: Option<String>,
    sale_created_at: DateTime<Utc>,
    product_id: Uuid,
    name: String,
    sku: String,
    product_image: Option<String>,
    price: i64,
    stock_quantity: i32,
    collection_id: Uuid,
    product_created_at: DateTime<Utc>,
}

pub async fn list_sales(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<SaleList>> {
    let (page, limit, offset) = pagination.normalize();
    let rows = sqlx::query_as::<_, SaleWithProductRow>(
        r#"
        SELECT s.id AS sale_id, s.receipt_id, s.line_no, s.quantity,
               s.unit_price, s.total_amount, s.remark AS sale_remark,
               s.created_at AS sale_created_at,
               p.id AS product_id, p.name, p.sku, p.product_image, p.price,
               p.stock_quantity, p.collection_id,
               p.created_at AS product_created_at
        FROM sales s
        JOIN products p ON p.id = s.product_id
        ORDER BY s.created_at DESC, s.line_no ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sales")
        .fetch_one(&state.pool)
        .await?;

    let items = rows
        .into_iter()
        .map(|row| SaleWithProduct {
            sale: Sale {
                id: row.sale_id,
                receipt_id: row.receipt_id,
                product_id: row.product_id,
                line_no: row.line_no,
                quantity: row.quantity,
                unit_price: row.unit_price,
                total_amount: row.total_amount,
                remark: row.sale_remark,
                created_at: row.sale_created_at,
            },
            product: Product {
                id: row.product_id,
                name: row.name,
                sku: row.sku,
                product_image: row.product_image,
                price: row.price,
                stock_quantity: row.stock_quantity,
                collection_id: row.collection_id,
                created_at: row.product_created_at,
            },
        })
        .collect();

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success("Sales", SaleList { items }, Some(meta)))
}

pub async fn list_receipts(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReceiptList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = SalesReceipts::find().order_by_desc(ReceiptCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let receipts = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let mut sales_by_receipt: HashMap<Uuid, Vec<Sale>> = HashMap::new();
    if !receipts.is_empty() {
        let receipt_ids: Vec<Uuid> = receipts.iter().map(|r| r.id).collect();
        let sales = Sales::find()
            .filter(SaleCol::ReceiptId.is_in(receipt_ids))
            .order_by_asc(SaleCol::LineNo)
            .all(&state.orm)
            .await?;
        for sale in sales {
            sales_by_receipt
                .entry(sale.receipt_id)
                .or_default()
                .push(sale.into());
        }
    }

    let items = receipts
        .into_iter()
        .map(|receipt| {
            let sales = sales_by_receipt.remove(&receipt.id).unwrap_or_default();
            ReceiptWithSales {
                receipt: receipt.into(),
                sales,
            }
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Receipts",
        ReceiptList { items },
        Some(meta),
    ))
}

pub async fn get_receipt(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ReceiptWithSales>> {
    let receipt = SalesReceipts::find_by_id(id).one(&state.orm).await?;
    let receipt = match receipt {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let sales = Sales::find()
        .filter(SaleCol::ReceiptId.eq(receipt.id))
        .order_by_asc(SaleCol::LineNo)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Sale::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        ReceiptWithSales {
            receipt: receipt.into(),
            sales,
        },
        Some(Meta::empty()),
    ))
}

/// Multiple cart lines may reference the same product; they stay distinct
/// sale rows but collapse into a single stock decrement.
fn sum_quantities_per_product(cart: &[CartLine]) -> BTreeMap<Uuid, i64> {
    let mut summed: BTreeMap<Uuid, i64> = BTreeMap::new();
    for line in cart {
        *summed.entry(line.product_id).or_insert(0) += i64::from(line.quantity);
    }
    summed
}

fn build_receipt_number(receipt_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = receipt_id.to_string();
    let short = &suffix[..8];
    format!("RCP-{}-{}", date, short)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: Uuid, quantity: i32) -> CartLine {
        CartLine {
            product_id,
            quantity,
            unit_price: 100,
            total_amount: None,
            remark: None,
        }
    }

    #[test]
    fn repeated_products_sum_into_one_decrement() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let summed = sum_quantities_per_product(&[line(a, 2), line(b, 1), line(a, 3)]);
        assert_eq!(summed.len(), 2);
        assert_eq!(summed[&a], 5);
        assert_eq!(summed[&b], 1);
    }

    #[test]
    fn oversized_quantities_sum_without_wrapping() {
        let a = Uuid::new_v4();
        let summed =
            sum_quantities_per_product(&[line(a, 2_000_000_000), line(a, 2_000_000_000)]);
        assert_eq!(summed[&a], 4_000_000_000_i64);
    }

    #[test]
    fn receipt_numbers_carry_date_and_short_id() {
        let id = Uuid::new_v4();
        let number = build_receipt_number(id);
        assert!(number.starts_with("RCP-"));
        assert!(number.ends_with(&id.to_string()[..8]));
    }
}
