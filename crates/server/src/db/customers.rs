//! Customer repository.
//!
//! Customers are written once at checkout and only read back for
//! reporting; there is no update or delete surface.

use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;

use apotheca_core::{CustomerId, Email, PaymentMethod, Phone};

use super::store::{Store, Value};
use super::{StoreError, parse_stored};
use crate::models::{Customer, CustomerDetails};

/// Internal row type for customer queries.
#[derive(Debug, FromRow)]
struct CustomerRow {
    customer_id: i64,
    fullname: String,
    contact_info: String,
    email: Option<String>,
    address: Option<String>,
    payment_method: String,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = StoreError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let phone = Phone::parse(&row.contact_info).map_err(|e| {
            StoreError::DataCorruption(format!("invalid contact_info in database: {e}"))
        })?;
        let email = row
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| StoreError::DataCorruption(format!("invalid email in database: {e}")))?;
        let payment_method: PaymentMethod = parse_stored(&row.payment_method, "payment_method")?;

        Ok(Self {
            id: CustomerId::new(row.customer_id),
            full_name: row.fullname,
            phone,
            email,
            address: row.address,
            payment_method,
        })
    }
}

fn map_row(row: &SqliteRow) -> Result<Customer, StoreError> {
    CustomerRow::from_row(row)
        .map_err(StoreError::Database)?
        .try_into()
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    store: &'a Store,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Persist the customer captured at checkout.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the insert fails.
    pub async fn create(&self, details: &CustomerDetails) -> Result<CustomerId, StoreError> {
        let id = self
            .store
            .insert(
                "customers",
                &["fullname", "contact_info", "email", "address", "payment_method"],
                &[
                    Value::from(details.full_name.clone()),
                    Value::from(details.phone.as_str()),
                    Value::from(details.email.as_ref().map(|e| e.as_str().to_owned())),
                    Value::from(details.address.clone()),
                    Value::from(details.payment_method.as_str()),
                ],
            )
            .await?;
        Ok(CustomerId::new(id))
    }

    /// List every customer record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Customer>, StoreError> {
        let rows = self.store.read("customers", None, None, false).await?;
        rows.iter().map(map_row).collect()
    }
}
