//! Integration test support for Apotheca.
//!
//! Tests run against an in-memory `SQLite` database with the real
//! migrations applied, so the whole service stack is exercised without an
//! external server.
//!
//! ```bash
//! cargo test -p apotheca-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::SqlitePoolOptions;

use apotheca_core::{Category, Money, ProductId, Role, UserId};
use apotheca_server::db::{MIGRATOR, ProductRepository, Store, UserRepository};
use apotheca_server::models::NewProduct;
use apotheca_server::services::auth::AuthService;
use apotheca_server::services::invoice::{InvoiceDocument, InvoiceError, InvoiceGenerator};

/// A migrated in-memory database plus the service handles tests need.
pub struct TestContext {
    pub store: Store,
}

impl TestContext {
    /// Create a fresh in-memory database with the schema applied.
    ///
    /// # Panics
    ///
    /// Panics if the database or migrations fail; tests cannot proceed
    /// without them.
    #[allow(clippy::unwrap_used)]
    pub async fn new() -> Self {
        // One connection, or every pool checkout would see its own
        // empty in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        MIGRATOR.run(&pool).await.unwrap();

        Self {
            store: Store::new(pool),
        }
    }

    /// Insert a product and return its ID.
    ///
    /// # Panics
    ///
    /// Panics on database failure.
    #[allow(clippy::unwrap_used)]
    pub async fn seed_product(&self, name: &str, price: &str, stock: i64) -> ProductId {
        let price: Decimal = price.parse().unwrap();
        ProductRepository::new(&self.store)
            .create(&NewProduct {
                name: name.to_owned(),
                brand: "Generic".to_owned(),
                category: Category::Medication,
                price: Money::cedis(price),
                quantity_in_stock: stock,
                expiry_date: NaiveDate::from_ymd_opt(2027, 6, 30).unwrap(),
                manufacturer: "Acme Pharma".to_owned(),
            })
            .await
            .unwrap()
    }

    /// Register a cashier account to act as the checkout attendant.
    ///
    /// # Panics
    ///
    /// Panics on database failure.
    #[allow(clippy::unwrap_used)]
    pub async fn seed_attendant(&self, email: &str) -> UserId {
        AuthService::new(&self.store)
            .register("Attendant", email, "qwerty12", Role::Cashier, "0241234567")
            .await
            .unwrap()
            .id
    }

    /// Current stock counter for a product.
    ///
    /// # Panics
    ///
    /// Panics on database failure or if the product is missing.
    #[allow(clippy::unwrap_used)]
    pub async fn stock_of(&self, id: ProductId) -> i64 {
        ProductRepository::new(&self.store)
            .get_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .quantity_in_stock
    }

    /// User repository handle for assertions.
    #[must_use]
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.store)
    }
}

/// An invoice generator that always fails, for exercising the
/// best-effort invoicing path.
pub struct FailingInvoiceGenerator;

impl InvoiceGenerator for FailingInvoiceGenerator {
    fn generate(&self, _document: &InvoiceDocument) -> Result<PathBuf, InvoiceError> {
        Err(InvoiceError::Io(std::io::Error::other(
            "invoice output unavailable",
        )))
    }
}
