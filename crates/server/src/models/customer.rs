//! Customer domain types.

use apotheca_core::{CustomerId, Email, PaymentMethod, Phone};

/// Validated customer details collected at checkout.
///
/// Created once per order; there is no customer update or delete.
#[derive(Debug, Clone)]
pub struct CustomerDetails {
    /// Customer's full name.
    pub full_name: String,
    /// Contact phone number.
    pub phone: Phone,
    /// Optional email address.
    pub email: Option<Email>,
    /// Optional home address.
    pub address: Option<String>,
    /// How the order is settled.
    pub payment_method: PaymentMethod,
}

/// A persisted customer record.
#[derive(Debug, Clone)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    pub full_name: String,
    pub phone: Phone,
    pub email: Option<Email>,
    pub address: Option<String>,
    pub payment_method: PaymentMethod,
}
