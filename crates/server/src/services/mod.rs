//! Business services: authentication, cart, checkout, and invoices.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod invoice;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
pub use checkout::{CheckoutError, CheckoutRequest, CheckoutService, Receipt};
pub use invoice::{HtmlInvoiceGenerator, InvoiceDocument, InvoiceError, InvoiceGenerator, InvoiceLine};
