use rust_decimal::Decimal;
use shophub_catalog_api::{config::AppConfig, db::create_pool, slug::derive_slug};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    seed_products(&pool).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = vec![
        (
            "MacBook Pro 16",
            "Apple laptop with the M4 Pro chip",
            "Electronics",
            Decimal::new(2_499_00, 2),
            12,
        ),
        (
            "Desk Lamp",
            "Adjustable warm-light desk lamp",
            "Home & Garden",
            Decimal::new(34_50, 2),
            80,
        ),
        (
            "Ergonomic Chair",
            "Mesh back office chair with lumbar support",
            "Furniture",
            Decimal::new(249_99, 2),
            25,
        ),
        (
            "Rust in Action",
            "Systems programming concepts and hands-on projects",
            "Books",
            Decimal::new(39_95, 2),
            60,
        ),
        (
            "Trail Running Shoes",
            "Grippy all-terrain runners",
            "Sports",
            Decimal::new(89_00, 2),
            40,
        ),
    ];

    for (name, description, category, price, stock) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, slug, description, price, stock, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(derive_slug(name))
        .bind(description)
        .bind(price)
        .bind(stock)
        .bind(category)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
