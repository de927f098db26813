//! # Seed Data Generator
//!
//! Populates the catalog with sample products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p catalog-db --bin seed
//!
//! # Generate custom amount into a specific database
//! cargo run -p catalog-db --bin seed -- --count 1000 --db ./data/catalog.db
//! ```
//!
//! Products are staged through one unit of work and committed with a single
//! save, so a failed seed leaves the database untouched.

use catalog_core::{Money, Product};
use catalog_db::{Database, DbConfig, Repository};
use std::env;

/// Product families for realistic test data.
const FAMILIES: &[&str] = &[
    "Coffee Beans",
    "Green Tea",
    "Olive Oil",
    "Dark Chocolate",
    "Sparkling Water",
    "Oat Milk",
    "Granola",
    "Peanut Butter",
    "Basmati Rice",
    "Pasta",
];

/// Size variants with their price addon in cents.
const SIZES: &[(&str, i64)] = &[
    ("Small", 0),
    ("Medium", 150),
    ("Large", 300),
    ("Family Pack", 700),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./catalog_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./catalog_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Catalog Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let ctx = db.context();
    let products = ctx.set::<Product>();

    let existing = products.count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    for seed in 0..count {
        products.add(generate_product(seed));
    }

    let summary = products.save().await?;

    let elapsed = start.elapsed();
    println!("✓ Inserted {} products in {:?}", summary.inserted, elapsed);

    db.close().await;
    Ok(())
}

/// Generates a single product with deterministic data.
fn generate_product(seed: usize) -> Product {
    let family = FAMILIES[seed % FAMILIES.len()];
    let (size, addon) = SIZES[(seed / FAMILIES.len()) % SIZES.len()];
    let batch = seed / (FAMILIES.len() * SIZES.len());

    // Base price $1.99 - $9.98
    let base_cents = 199 + ((seed * 17) % 800) as i64;

    let name = if batch == 0 {
        format!("{} {}", family, size)
    } else {
        format!("{} {} #{}", family, size, batch + 1)
    };

    Product::new(name, Money::from_cents(base_cents + addon))
}
