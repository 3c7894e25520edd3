//! Product repository for catalog and stock access.
//!
//! All queries go through the four-operation [`Store`]; this module adds
//! the row-to-domain mapping and the product-shaped call surface.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;

use apotheca_core::{Category, Money, ProductId};

use super::store::{Store, Value};
use super::{StoreError, parse_stored};
use crate::models::{NewProduct, Product};

/// Internal row type for product queries.
#[derive(Debug, FromRow)]
struct ProductRow {
    product_id: i64,
    name: String,
    brand: String,
    category: String,
    price: String,
    quantity_in_stock: i64,
    expiry_date: NaiveDate,
    manufacturer: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category: Category = parse_stored(&row.category, "category")?;
        let price: Decimal = parse_stored(&row.price, "price")?;

        Ok(Self {
            id: ProductId::new(row.product_id),
            name: row.name,
            brand: row.brand,
            category,
            price: Money::cedis(price),
            quantity_in_stock: row.quantity_in_stock,
            expiry_date: row.expiry_date,
            manufacturer: row.manufacturer,
        })
    }
}

fn map_row(row: &SqliteRow) -> Result<Product, StoreError> {
    ProductRow::from_row(row)
        .map_err(StoreError::Database)?
        .try_into()
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    store: &'a Store,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// List the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails, or
    /// `StoreError::DataCorruption` if stored data is invalid.
    pub async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = self.store.read("products", None, None, false).await?;
        rows.iter().map(map_row).collect()
    }

    /// Substring search over product names.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn search(&self, fragment: &str) -> Result<Vec<Product>, StoreError> {
        let pattern = format!("%{fragment}%");
        let rows = self
            .store
            .read("products", Some(&[("name", Value::from(pattern))]), None, true)
            .await?;
        rows.iter().map(map_row).collect()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let rows = self
            .store
            .read(
                "products",
                Some(&[("product_id", Value::from(id.as_i64()))]),
                None,
                false,
            )
            .await?;
        rows.first().map(map_row).transpose()
    }

    /// Get a product by its exact name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        let rows = self
            .store
            .read("products", Some(&[("name", Value::from(name))]), None, false)
            .await?;
        rows.first().map(map_row).transpose()
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<ProductId, StoreError> {
        let id = self
            .store
            .insert(
                "products",
                &[
                    "name",
                    "brand",
                    "category",
                    "price",
                    "quantity_in_stock",
                    "expiry_date",
                    "manufacturer",
                ],
                &[
                    Value::from(product.name.clone()),
                    Value::from(product.brand.clone()),
                    Value::from(product.category.as_str()),
                    Value::from(product.price.amount),
                    Value::from(product.quantity_in_stock),
                    Value::from(product.expiry_date),
                    Value::from(product.manufacturer.clone()),
                ],
            )
            .await?;
        Ok(ProductId::new(id))
    }

    /// Replace every editable field of a product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product doesn't exist.
    pub async fn update(&self, id: ProductId, product: &NewProduct) -> Result<(), StoreError> {
        let changed = self
            .store
            .update(
                "products",
                &[
                    ("name", Value::from(product.name.clone())),
                    ("brand", Value::from(product.brand.clone())),
                    ("category", Value::from(product.category.as_str())),
                    ("price", Value::from(product.price.amount)),
                    ("quantity_in_stock", Value::from(product.quantity_in_stock)),
                    ("expiry_date", Value::from(product.expiry_date)),
                    ("manufacturer", Value::from(product.manufacturer.clone())),
                ],
                &[("product_id", Value::from(id.as_i64()))],
            )
            .await?;

        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Set a product's stock counter.
    ///
    /// Callers are responsible for clamping; the counter itself is written
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product doesn't exist.
    pub async fn set_stock(&self, id: ProductId, quantity: i64) -> Result<(), StoreError> {
        let changed = self
            .store
            .update(
                "products",
                &[("quantity_in_stock", Value::from(quantity))],
                &[("product_id", Value::from(id.as_i64()))],
            )
            .await?;

        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Number of products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn count(&self) -> Result<usize, StoreError> {
        let rows = self
            .store
            .read("products", None, Some(&["product_id"]), false)
            .await?;
        Ok(rows.len())
    }
}
