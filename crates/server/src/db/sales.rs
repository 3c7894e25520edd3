//! Sale repository.
//!
//! Sales are append-only: one row per completed checkout, never updated.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;

use apotheca_core::{Money, SaleId, UserId};

use super::store::{Store, Value};
use super::{StoreError, parse_stored};
use crate::models::Sale;

/// Internal row type for sale queries.
#[derive(Debug, FromRow)]
struct SaleRow {
    sale_id: i64,
    user_id: i64,
    customer_name: String,
    invoice_number: String,
    sale_date: DateTime<Utc>,
    total_amount: String,
}

impl TryFrom<SaleRow> for Sale {
    type Error = StoreError;

    fn try_from(row: SaleRow) -> Result<Self, Self::Error> {
        let total: Decimal = parse_stored(&row.total_amount, "total_amount")?;

        Ok(Self {
            id: SaleId::new(row.sale_id),
            attendant: UserId::new(row.user_id),
            customer_name: row.customer_name,
            invoice_number: row.invoice_number,
            sold_at: row.sale_date,
            total: Money::cedis(total),
        })
    }
}

fn map_row(row: &SqliteRow) -> Result<Sale, StoreError> {
    SaleRow::from_row(row).map_err(StoreError::Database)?.try_into()
}

/// Repository for sale database operations.
pub struct SaleRepository<'a> {
    store: &'a Store,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Record a completed checkout.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the insert fails.
    pub async fn create(
        &self,
        attendant: UserId,
        customer_name: &str,
        invoice_number: &str,
        sold_at: DateTime<Utc>,
        total: Money,
    ) -> Result<SaleId, StoreError> {
        let id = self
            .store
            .insert(
                "sales",
                &["user_id", "customer_name", "invoice_number", "sale_date", "total_amount"],
                &[
                    Value::from(attendant.as_i64()),
                    Value::from(customer_name),
                    Value::from(invoice_number),
                    Value::from(sold_at),
                    Value::from(total.amount),
                ],
            )
            .await?;
        Ok(SaleId::new(id))
    }

    /// List every recorded sale.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Sale>, StoreError> {
        let rows = self.store.read("sales", None, None, false).await?;
        rows.iter().map(map_row).collect()
    }
}
