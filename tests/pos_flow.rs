use axum_pos_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        collections::{CreateCollectionRequest, UpdateCollectionRequest},
        products::{CreateProductRequest, UpdateProductRequest},
        sales::{CartLine, CheckoutRequest},
    },
    entity::{products::Entity as Products, sales_receipts::ActiveModel as ReceiptActive},
    error::AppError,
    routes::params::{CollectionListQuery, Pagination, ProductListQuery},
    services::{collection_service, dashboard_service, product_service, sales_service},
    state::AppState,
};
use chrono::{Duration, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, Statement};
use uuid::Uuid;

// Integration flow: catalog CRUD -> checkout -> history queries -> reversal -> dashboard.
#[tokio::test]
async fn catalog_checkout_and_dashboard_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // Seed collections
    let beverages = collection_service::create_collection(
        &state,
        CreateCollectionRequest {
            name: "Beverages".into(),
        },
    )
    .await?
    .data
    .unwrap();
    let bakery = collection_service::create_collection(
        &state,
        CreateCollectionRequest {
            name: "Bakery".into(),
        },
    )
    .await?
    .data
    .unwrap();

    // Seed products
    let tea = create_product(&state, "Green Tea", "BEV-GT", 1000, 10, beverages.id).await?;
    let soda = create_product(&state, "Club Soda", "BEV-CS", 500, 8, beverages.id).await?;
    let croissant = create_product(&state, "Almond Croissant", "BAK-AC", 400, 12, bakery.id).await?;

    // Listing is name-ordered; search is case-insensitive; collection filter is exact.
    let all = list_products(&state, None, None).await?;
    let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Almond Croissant", "Club Soda", "Green Tea"]);

    let found = list_products(&state, Some("green"), None).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].sku, "BEV-GT");

    let in_beverages = list_products(&state, None, Some(beverages.id)).await?;
    assert_eq!(in_beverages.len(), 2);

    // Partial update touches only the supplied fields.
    let updated = product_service::update_product(
        &state,
        soda,
        UpdateProductRequest {
            price: Some(550),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.price, 550);
    assert_eq!(updated.name, "Club Soda");
    assert_eq!(updated.stock_quantity, 8);

    let err = product_service::update_product(
        &state,
        soda,
        UpdateProductRequest {
            price: Some(-1),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = product_service::get_product(&state, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Collections list in creation order, each nesting its products by name.
    let collections = collection_service::list_collections(&state, CollectionListQuery { search: None })
        .await?
        .data
        .unwrap()
        .items;
    assert_eq!(collections.len(), 2);
    assert_eq!(collections[0].collection.name, "Beverages");
    let nested: Vec<&str> = collections[0]
        .products
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(nested, vec!["Club Soda", "Green Tea"]);

    let renamed = collection_service::update_collection(
        &state,
        bakery.id,
        UpdateCollectionRequest {
            name: "Bakery & Pastry".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(renamed.name, "Bakery & Pastry");

    // A collection that still owns products cannot be deleted.
    let err = collection_service::delete_collection(&state, beverages.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Checkout rejections: empty cart, bad quantity, unknown product, short stock.
    let err = sales_service::checkout(
        &state,
        CheckoutRequest {
            cart: vec![],
            total: 0,
            remark: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = sales_service::checkout(
        &state,
        CheckoutRequest {
            cart: vec![cart_line(tea, 0, 1000)],
            total: 0,
            remark: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = sales_service::checkout(
        &state,
        CheckoutRequest {
            cart: vec![cart_line(tea, 1, 1000), cart_line(Uuid::new_v4(), 1, 100)],
            total: 1100,
            remark: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = sales_service::checkout(
        &state,
        CheckoutRequest {
            cart: vec![cart_line(tea, 99, 1000)],
            total: 99_000,
            remark: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // A cart whose summed quantity exceeds i32 still fails the stock guard.
    let err = sales_service::checkout(
        &state,
        CheckoutRequest {
            cart: vec![
                cart_line(tea, 2_000_000_000, 1000),
                cart_line(tea, 2_000_000_000, 1000),
            ],
            total: 0,
            remark: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // A line amount that overflows i64 rolls the whole checkout back.
    let err = sales_service::checkout(
        &state,
        CheckoutRequest {
            cart: vec![CartLine {
                product_id: tea,
                quantity: 2,
                unit_price: i64::MAX,
                total_amount: None,
                remark: None,
            }],
            total: 0,
            remark: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(stock_of(&state, tea).await?, 10);

    // A valid cart: the same product on two lines plus a discounted line.
    let checkout_resp = sales_service::checkout(
        &state,
        CheckoutRequest {
            cart: vec![
                cart_line(tea, 2, 1000),
                CartLine {
                    product_id: soda,
                    quantity: 1,
                    unit_price: 550,
                    total_amount: Some(480),
                    remark: Some("loyalty discount".into()),
                },
                cart_line(tea, 3, 1000),
            ],
            total: 5480,
            remark: Some("walk-in".into()),
        },
    )
    .await?;
    assert_eq!(checkout_resp.message, "Checkout successful");

    let created = checkout_resp.data.unwrap();
    assert!(created.receipt.receipt_number.starts_with("RCP-"));
    assert_eq!(created.receipt.total, 5480);
    assert_eq!(created.sales.len(), 3);
    let line_nos: Vec<i32> = created.sales.iter().map(|s| s.line_no).collect();
    assert_eq!(line_nos, vec![1, 2, 3]);
    assert_eq!(created.sales[0].quantity, 2);
    assert_eq!(created.sales[0].unit_price, 1000);
    assert_eq!(created.sales[2].quantity, 3);
    // Derived line total on the first line, the supplied override on the second.
    assert_eq!(created.sales[0].total_amount, 2000);
    assert_eq!(created.sales[1].total_amount, 480);
    assert_eq!(created.sales[1].remark.as_deref(), Some("loyalty discount"));

    // Two tea lines collapse into a single decrement of five.
    assert_eq!(stock_of(&state, tea).await?, 5);
    assert_eq!(stock_of(&state, soda).await?, 7);

    // Transaction history joins each line with its product.
    let sales_resp = sales_service::list_sales(&state, page(1, 20)).await?;
    assert_eq!(sales_resp.meta.unwrap().total, Some(3));
    let listed = sales_resp.data.unwrap().items;
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].sale.line_no, 1);
    assert_eq!(listed[0].product.name, "Green Tea");

    let receipts_resp = sales_service::list_receipts(&state, page(1, 20)).await?;
    assert_eq!(receipts_resp.meta.unwrap().total, Some(1));
    let receipts = receipts_resp.data.unwrap().items;
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].sales.len(), 3);

    let fetched = sales_service::get_receipt(&state, created.receipt.id).await?;
    assert_eq!(
        fetched.data.unwrap().receipt.receipt_number,
        created.receipt.receipt_number
    );

    // Reversal restores the decremented stock and removes the rows.
    let delete_resp = sales_service::delete_receipt(&state, created.receipt.id).await?;
    assert_eq!(delete_resp.message, "Receipt and sales deleted");
    assert_eq!(stock_of(&state, tea).await?, 10);
    assert_eq!(stock_of(&state, soda).await?, 8);

    let err = sales_service::get_receipt(&state, created.receipt.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = sales_service::delete_receipt(&state, created.receipt.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Once its last product is gone the collection can be deleted.
    product_service::delete_product(&state, croissant).await?;
    collection_service::delete_collection(&state, bakery.id).await?;
    let err = product_service::get_product(&state, croissant)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = collection_service::delete_collection(&state, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Dashboard splits today's receipts from the all-time totals; a
    // future-dated receipt belongs to all-time only.
    seed_receipt(&state, "RCP-SEED-0001", 700, Some(Utc::now() - Duration::days(1))).await?;
    seed_receipt(&state, "RCP-SEED-0002", 1500, None).await?;
    seed_receipt(&state, "RCP-SEED-0003", 900, Some(Utc::now() + Duration::days(1))).await?;

    let dash = dashboard_service::dashboard_metrics(&state).await?.data.unwrap();
    assert_eq!(dash.sales_summary.all_time_receipts, 3);
    assert_eq!(dash.sales_summary.all_time_total, 3100);
    assert_eq!(dash.sales_summary.today_receipts, 1);
    assert_eq!(dash.sales_summary.today_total, 1500);
    let popular: Vec<&str> = dash
        .popular_products
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(popular, vec!["Green Tea", "Club Soda"]);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE sales, sales_receipts, products, collections, audit_logs RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState {
        pool,
        orm,
        storage: None,
    })
}

async fn create_product(
    state: &AppState,
    name: &str,
    sku: &str,
    price: i64,
    stock_quantity: i32,
    collection_id: Uuid,
) -> anyhow::Result<Uuid> {
    let created = product_service::create_product(
        state,
        CreateProductRequest {
            name: name.to_string(),
            sku: sku.to_string(),
            product_image: None,
            price,
            stock_quantity,
            collection_id,
        },
    )
    .await?;

    Ok(created.data.unwrap().id)
}

async fn list_products(
    state: &AppState,
    search: Option<&str>,
    collection_id: Option<Uuid>,
) -> anyhow::Result<Vec<axum_pos_api::models::Product>> {
    let resp = product_service::list_products(
        state,
        ProductListQuery {
            search: search.map(str::to_string),
            collection_id,
        },
    )
    .await?;
    Ok(resp.data.unwrap().items)
}

async fn stock_of(state: &AppState, product_id: Uuid) -> anyhow::Result<i32> {
    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .expect("product exists");
    Ok(product.stock_quantity)
}

async fn seed_receipt(
    state: &AppState,
    receipt_number: &str,
    total: i64,
    created_at: Option<chrono::DateTime<Utc>>,
) -> anyhow::Result<()> {
    ReceiptActive {
        id: Set(Uuid::new_v4()),
        receipt_number: Set(receipt_number.to_string()),
        total: Set(total),
        remark: Set(None),
        created_at: match created_at {
            Some(ts) => Set(ts.fixed_offset()),
            None => NotSet,
        },
    }
    .insert(&state.orm)
    .await?;

    Ok(())
}

fn cart_line(product_id: Uuid, quantity: i32, unit_price: i64) -> CartLine {
    CartLine {
        product_id,
        quantity,
        unit_price,
        total_amount: None,
        remark: None,
    }
}

fn page(page: i64, per_page: i64) -> Pagination {
    Pagination {
        page: Some(page),
        per_page: Some(per_page),
    }
}
