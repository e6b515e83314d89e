//! Seed the database with a demo catalog.
//!
//! Inserts a small set of products for local development. Products are
//! keyed by name here, so re-running the command skips ones that already
//! exist instead of duplicating them.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use super::migrate::MigrationError;

struct SeedProduct {
    name: &'static str,
    quantity: i32,
    category: &'static [&'static str],
    price: Decimal,
    description: &'static str,
    image: &'static str,
}

fn demo_catalog() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Stovetop Kettle",
            quantity: 40,
            category: &["kitchen"],
            price: Decimal::new(49_99, 2),
            description: "Two litre stainless steel kettle.",
            image: "/images/stovetop-kettle.jpg",
        },
        SeedProduct {
            name: "Ceramic Mug",
            quantity: 120,
            category: &["kitchen", "gifts"],
            price: Decimal::new(9_99, 2),
            description: "Hand-glazed 300ml mug.",
            image: "/images/ceramic-mug.jpg",
        },
        SeedProduct {
            name: "Cast Iron Teapot",
            quantity: 15,
            category: &["kitchen"],
            price: Decimal::new(89_50, 2),
            description: "One litre teapot with infuser basket.",
            image: "/images/cast-iron-teapot.jpg",
        },
        SeedProduct {
            name: "Linen Tea Towel",
            quantity: 200,
            category: &["textiles"],
            price: Decimal::new(14_00, 2),
            description: "Washed linen, 50x70cm.",
            image: "/images/linen-tea-towel.jpg",
        },
    ]
}

/// Insert the demo catalog.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing or an insert
/// fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("API_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar("API_DATABASE_URL"))?;

    info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let mut inserted = 0u32;
    for product in demo_catalog() {
        let categories: Vec<String> = product.category.iter().map(ToString::to_string).collect();

        let result = sqlx::query(
            r"
            INSERT INTO products (name, quantity, category, price, description, image)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $1)
            ",
        )
        .bind(product.name)
        .bind(product.quantity)
        .bind(&categories)
        .bind(product.price)
        .bind(product.description)
        .bind(product.image)
        .execute(&pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
            info!(name = product.name, "seeded product");
        }
    }

    info!("Seeding complete, {inserted} products inserted");
    Ok(())
}
