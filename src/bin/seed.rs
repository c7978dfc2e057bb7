use axum_pos_api::{
    config::AppConfig,
    db::create_pool,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let drinks_id = ensure_collection(&pool, "Drinks").await?;
    let snacks_id = ensure_collection(&pool, "Snacks").await?;
    let stationery_id = ensure_collection(&pool, "Stationery").await?;
    seed_products(&pool, drinks_id, snacks_id, stationery_id).await?;

    println!("Seed completed");
    Ok(())
}

async fn ensure_collection(pool: &sqlx::PgPool, name: &str) -> anyhow::Result<Uuid> {
    // Collection names are not constrained unique, so look before inserting.
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM collections WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    let collection_id = match existing {
        Some((id,)) => id,
        None => {
            let row: (Uuid,) = sqlx::query_as(
                r#"
                INSERT INTO collections (id, name)
                VALUES ($1, $2)
                RETURNING id
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(name)
            .fetch_one(pool)
            .await?;
            row.0
        }
    };

    println!("Ensured collection {name}");
    Ok(collection_id)
}

async fn seed_products(
    pool: &sqlx::PgPool,
    drinks_id: Uuid,
    snacks_id: Uuid,
    stationery_id: Uuid,
) -> anyhow::Result<()> {
    let products = vec![
        ("Iced Latte", "DRK-001", 450_i64, 80, drinks_id),
        ("Sparkling Water", "DRK-002", 250, 120, drinks_id),
        ("Cold Brew Bottle", "DRK-003", 550, 60, drinks_id),
        ("Sea Salt Chips", "SNK-001", 300, 150, snacks_id),
        ("Chocolate Bar", "SNK-002", 350, 200, snacks_id),
        ("Granola Pack", "SNK-003", 420, 90, snacks_id),
        ("Gel Pen", "STA-001", 180, 300, stationery_id),
        ("Pocket Notebook", "STA-002", 520, 140, stationery_id),
    ];

    for (name, sku, price, stock, collection_id) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, sku, price, stock_quantity, collection_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (sku) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(sku)
        .bind(price)
        .bind(stock)
        .bind(collection_id)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
