//! Seed the catalog with starter products.
//!
//! Intended for fresh installs and demos; refuses to touch a catalog
//! that already has rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use apotheca_core::{Category, Money};
use apotheca_server::db::{ProductRepository, Store};
use apotheca_server::models::NewProduct;

/// Starter catalog: (name, brand, category, price, stock, expiry, manufacturer).
const STARTER_PRODUCTS: &[(&str, &str, Category, &str, i64, &str, &str)] = &[
    ("Paracetamol", "Panadol", Category::Medication, "5.00", 200, "2027-06-30", "GSK"),
    ("Ibuprofen", "Advil", Category::Medication, "8.50", 120, "2027-03-31", "Pfizer"),
    ("Vitamin C 500mg", "Nature's Aid", Category::HealthAndWellness, "12.00", 80, "2026-12-31", "Nature's Aid"),
    ("Baby Wipes", "Pampers", Category::BabyCare, "15.00", 60, "2028-01-31", "P&G"),
    ("Digital Thermometer", "Omron", Category::MedicalEquipment, "45.00", 25, "2030-01-01", "Omron"),
    ("Hand Sanitizer 250ml", "Dettol", Category::HygieneProducts, "9.75", 150, "2026-09-30", "Reckitt"),
];

/// Insert the starter products into an empty catalog.
///
/// # Errors
///
/// Returns an error if the database is unreachable or already seeded.
pub async fn products() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let store = Store::new(pool);
    let repo = ProductRepository::new(&store);

    let existing = repo.count().await?;
    if existing > 0 {
        return Err(format!("catalog already has {existing} products; refusing to seed").into());
    }

    for (name, brand, category, price, stock, expiry, manufacturer) in STARTER_PRODUCTS {
        let price: Decimal = price.parse()?;
        let expiry_date = NaiveDate::parse_from_str(expiry, "%Y-%m-%d")?;

        repo.create(&NewProduct {
            name: (*name).to_owned(),
            brand: (*brand).to_owned(),
            category: *category,
            price: Money::cedis(price),
            quantity_in_stock: *stock,
            expiry_date,
            manufacturer: (*manufacturer).to_owned(),
        })
        .await?;

        tracing::info!(product = name, "Seeded");
    }

    tracing::info!(count = STARTER_PRODUCTS.len(), "Catalog seeded");
    Ok(())
}
