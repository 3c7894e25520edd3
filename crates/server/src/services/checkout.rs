//! The checkout workflow.
//!
//! Turns a session cart into a persisted sale:
//!
//! ```text
//! Idle -> Validating -> Committing -> Invoicing -> Complete
//!            |              |
//!            +---- Failed <-+
//! ```
//!
//! Validating rejects the empty cart and bad customer details, then
//! re-reads every product row so a cart built against stale stock cannot
//! oversell. Committing clamps each decrement at zero, inserts the
//! customer, and stamps the invoice number. Invoicing is best-effort: a
//! rendering failure is logged and flagged on the receipt but never
//! blocks the sale record.
//!
//! Stock updates, the customer insert, and the sale insert are three
//! independent auto-commit statements; there is no rollback path. On
//! failure the caller keeps the cart, so retry after a partial commit is
//! possible and may decrement stock again.

use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use apotheca_core::{CustomerId, Email, Money, PaymentMethod, Phone, SaleId, UserId};

use crate::db::{CustomerRepository, ProductRepository, SaleRepository, Store, StoreError};
use crate::models::{Cart, CustomerDetails, Product};
use crate::services::invoice::{InvoiceDocument, InvoiceGenerator, InvoiceLine};

/// A single field validation failure, surfaced back onto the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name.
    pub field: &'static str,
    /// Message shown next to the field.
    pub message: String,
}

/// Raw checkout form input, validated by [`CheckoutRequest::validate`].
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub payment_method: String,
    pub comments: String,
}

impl CheckoutRequest {
    /// Validate the form into customer details.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once so the form can surface all
    /// messages in one round trip.
    pub fn validate(&self) -> Result<CustomerDetails, Vec<FieldError>> {
        let mut errors = Vec::new();

        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            errors.push(FieldError {
                field: "full_name",
                message: "Full name is required.".to_owned(),
            });
        }

        let phone = match Phone::parse(self.phone.trim()) {
            Ok(phone) => Some(phone),
            Err(_) => {
                errors.push(FieldError {
                    field: "phone",
                    message: "Invalid phone number format.".to_owned(),
                });
                None
            }
        };

        let email = match self.email.trim() {
            "" => None,
            raw => match Email::parse(raw) {
                Ok(email) => Some(email),
                Err(e) => {
                    errors.push(FieldError {
                        field: "email",
                        message: e.to_string(),
                    });
                    None
                }
            },
        };

        let address = match self.address.trim() {
            "" => None,
            raw => Some(raw.to_owned()),
        };

        let payment_method = match self.payment_method.parse::<PaymentMethod>() {
            Ok(method) => Some(method),
            Err(_) => {
                errors.push(FieldError {
                    field: "payment_method",
                    message: "Choose a payment method.".to_owned(),
                });
                None
            }
        };

        match (phone, payment_method) {
            (Some(phone), Some(payment_method)) if errors.is_empty() => Ok(CustomerDetails {
                full_name: full_name.to_owned(),
                phone,
                email,
                address,
                payment_method,
            }),
            _ => Err(errors),
        }
    }
}

/// Errors that abort a checkout. The cart is left untouched so the
/// attendant may retry.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout submitted with nothing in the cart.
    #[error("the cart is empty")]
    EmptyCart,

    /// Customer details failed validation.
    #[error("invalid customer details")]
    Validation(Vec<FieldError>),

    /// A cart line refers to a product that no longer exists.
    #[error("product not found: {0}")]
    NotFound(String),

    /// Stock fell below a cart line's quantity since it was added.
    #[error("insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        name: String,
        requested: u32,
        available: i64,
    },

    /// Database failure mid-workflow; surfaced to the user as a generic
    /// order-processing failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The outcome of a completed checkout.
#[derive(Debug)]
pub struct Receipt {
    /// Invoice reference, `INV<unix_timestamp>`.
    pub invoice_number: String,
    /// Sum of line totals at checkout time.
    pub total: Money,
    /// The customer row created for this order.
    pub customer_id: CustomerId,
    /// The sale row created for this order.
    pub sale_id: SaleId,
    /// Where the invoice was written, when rendering succeeded.
    pub invoice_path: Option<PathBuf>,
    /// Rendering failure detail, when it did not. The sale is still
    /// recorded.
    pub invoice_error: Option<String>,
}

/// The checkout workflow service.
pub struct CheckoutService<'a> {
    store: &'a Store,
    invoices: &'a dyn InvoiceGenerator,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(store: &'a Store, invoices: &'a dyn InvoiceGenerator) -> Self {
        Self { store, invoices }
    }

    /// Run the whole workflow for one cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] from the validating phase with no rows
    /// written; a `Store` error from the committing phase may leave a
    /// partial commit behind (see module docs).
    #[instrument(skip(self, cart, request), fields(lines = cart.len()))]
    pub async fn place_order(
        &self,
        attendant: UserId,
        cart: &Cart,
        request: &CheckoutRequest,
    ) -> Result<Receipt, CheckoutError> {
        // Validating
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let details = request.validate().map_err(CheckoutError::Validation)?;

        let products = ProductRepository::new(self.store);
        let shelf = self.revalidate_stock(&products, cart).await?;

        // Committing: clamp each decrement at zero, then record the
        // customer. Each statement commits on its own.
        for (line, product) in cart.lines().iter().zip(&shelf) {
            let remaining = (product.quantity_in_stock - i64::from(line.quantity)).max(0);
            products.set_stock(product.id, remaining).await?;
        }

        let customer_id = CustomerRepository::new(self.store).create(&details).await?;

        let committed_at = Utc::now();
        let invoice_number = format!("INV{}", committed_at.timestamp());
        let total = cart.total();

        // Invoicing: best-effort.
        let document = build_document(&invoice_number, &details, cart, request);
        let (invoice_path, invoice_error) = match self.invoices.generate(&document) {
            Ok(path) => (Some(path), None),
            Err(e) => {
                tracing::warn!(invoice = %invoice_number, error = %e, "Invoice rendering failed; sale will still be recorded");
                (None, Some(e.to_string()))
            }
        };

        let sale_id = SaleRepository::new(self.store)
            .create(
                attendant,
                &details.full_name,
                &invoice_number,
                committed_at,
                total,
            )
            .await?;

        tracing::info!(invoice = %invoice_number, %total, "Checkout complete");

        Ok(Receipt {
            invoice_number,
            total,
            customer_id,
            sale_id,
            invoice_path,
            invoice_error,
        })
    }

    /// Re-read every product row and reject the order if stock no longer
    /// covers a line. Stock was already checked at add-to-cart time, but
    /// another cart may have drained the shelf since.
    async fn revalidate_stock(
        &self,
        products: &ProductRepository<'_>,
        cart: &Cart,
    ) -> Result<Vec<Product>, CheckoutError> {
        let mut shelf = Vec::with_capacity(cart.len());
        for line in cart.lines() {
            let product = products
                .get_by_id(line.product_id)
                .await?
                .ok_or_else(|| CheckoutError::NotFound(line.name.clone()))?;

            if product.quantity_in_stock < i64::from(line.quantity) {
                return Err(CheckoutError::InsufficientStock {
                    name: product.name,
                    requested: line.quantity,
                    available: product.quantity_in_stock,
                });
            }
            shelf.push(product);
        }
        Ok(shelf)
    }
}

/// Assemble the structured document handed to the invoice boundary.
fn build_document(
    invoice_number: &str,
    details: &CustomerDetails,
    cart: &Cart,
    request: &CheckoutRequest,
) -> InvoiceDocument {
    InvoiceDocument {
        invoice_number: invoice_number.to_owned(),
        issued_on: Utc::now().date_naive(),
        customer_name: details.full_name.clone(),
        customer_phone: details.phone.as_str().to_owned(),
        payment_method: details.payment_method,
        lines: cart
            .lines()
            .iter()
            .map(|line| InvoiceLine {
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_total: line.line_total(),
            })
            .collect(),
        grand_total: cart.total(),
        comments: request.comments.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_request() -> CheckoutRequest {
        CheckoutRequest {
            full_name: "Ama Mensah".to_owned(),
            phone: "+233201234567".to_owned(),
            email: String::new(),
            address: String::new(),
            payment_method: "cash".to_owned(),
            comments: String::new(),
        }
    }

    #[test]
    fn test_validate_accepts_good_details() {
        let details = valid_request().validate().unwrap();
        assert_eq!(details.full_name, "Ama Mensah");
        assert_eq!(details.payment_method, PaymentMethod::Cash);
        assert!(details.email.is_none());
        assert!(details.address.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_phone() {
        let mut request = valid_request();
        request.phone = "12345".to_owned();

        let errors = request.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "phone");
        assert_eq!(errors[0].message, "Invalid phone number format.");
    }

    #[test]
    fn test_validate_collects_every_failure() {
        let request = CheckoutRequest {
            full_name: "   ".to_owned(),
            phone: "abc".to_owned(),
            email: "not-an-email".to_owned(),
            address: String::new(),
            payment_method: "gold".to_owned(),
            comments: String::new(),
        };

        let errors = request.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["full_name", "phone", "email", "payment_method"]);
    }

    #[test]
    fn test_validate_trims_optional_fields() {
        let mut request = valid_request();
        request.email = " ama@example.com ".trim().to_owned();
        request.address = "  ".to_owned();

        let details = request.validate().unwrap();
        assert_eq!(details.email.unwrap().as_str(), "ama@example.com");
        assert!(details.address.is_none());
    }
}
