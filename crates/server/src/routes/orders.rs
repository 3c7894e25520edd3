//! Checkout (orders) route handlers.
//!
//! The orders page shows the session cart and the customer form; the
//! submission drives the checkout workflow and clears the cart on
//! success.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use apotheca_core::{Money, Role};

use crate::error::AppError;
use crate::middleware::{Referer, RequireAuth, require_role};
use crate::models::Cart;
use crate::routes::cart::{clear_cart, load_cart};
use crate::services::checkout::{
    CheckoutError, CheckoutRequest, CheckoutService, FieldError,
};
use crate::state::AppState;

/// Roles allowed to check out orders.
const ORDER_ROLES: &[Role] = &[Role::Admin, Role::Cashier];

/// Query parameters for the orders page.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub error: Option<String>,
    pub invoice: Option<String>,
    pub warn: Option<String>,
}

/// Checkout form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub comments: String,
}

impl From<CheckoutForm> for CheckoutRequest {
    fn from(form: CheckoutForm) -> Self {
        Self {
            full_name: form.full_name,
            phone: form.phone,
            email: form.email,
            address: form.address,
            payment_method: form.payment_method,
            comments: form.comments,
        }
    }
}

/// Orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub cart: Cart,
    pub total: Money,
    pub values: CheckoutForm,
    pub field_errors: Vec<FieldError>,
    pub name: String,
    pub role: String,
    pub error: String,
    pub success: String,
}

/// Display the orders page.
pub async fn page(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Query(query): Query<OrdersQuery>,
    session: Session,
) -> Result<Response, AppError> {
    require_role(&user, ORDER_ROLES, referer.as_deref())?;

    let cart = load_cart(&session).await;

    let error = match query.error.as_deref() {
        Some("empty_cart") => "The cart is empty; add items before checking out.".to_owned(),
        Some("permission") => "You do not have permission to access that page.".to_owned(),
        Some(detail) => detail.to_owned(),
        None => String::new(),
    };
    let success = query.invoice.map_or_else(String::new, |invoice| {
        if query.warn.as_deref() == Some("invoice") {
            format!("Order completed as {invoice}, but the invoice file could not be written.")
        } else {
            format!("Order completed successfully. Invoice {invoice}.")
        }
    });

    let total = cart.total();
    Ok(OrdersTemplate {
        cart,
        total,
        values: CheckoutForm::default(),
        field_errors: Vec::new(),
        name: user.name,
        role: user.role.to_string(),
        error,
        success,
    }
    .into_response())
}

/// Handle the checkout submission.
pub async fn submit(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response, AppError> {
    require_role(&user, ORDER_ROLES, referer.as_deref())?;

    let cart = load_cart(&session).await;
    let request = CheckoutRequest::from(form.clone());
    let service = CheckoutService::new(state.store(), state.invoices());

    match service.place_order(user.id, &cart, &request).await {
        Ok(receipt) => {
            // Complete: the cart is consumed by the sale.
            clear_cart(&session).await?;
            let target = if receipt.invoice_error.is_some() {
                format!("/orders?invoice={}&warn=invoice", receipt.invoice_number)
            } else {
                format!("/orders?invoice={}", receipt.invoice_number)
            };
            Ok(Redirect::to(&target).into_response())
        }
        Err(CheckoutError::EmptyCart) => {
            Ok(Redirect::to("/orders?error=empty_cart").into_response())
        }
        Err(CheckoutError::Validation(field_errors)) => {
            // Recoverable: re-render the form with every field message.
            let total = cart.total();
            Ok(OrdersTemplate {
                cart,
                total,
                values: form,
                field_errors,
                name: user.name,
                role: user.role.to_string(),
                error: String::new(),
                success: String::new(),
            }
            .into_response())
        }
        Err(e @ (CheckoutError::NotFound(_) | CheckoutError::InsufficientStock { .. })) => {
            // Recoverable business-rule failure; the cart is kept.
            let total = cart.total();
            Ok(OrdersTemplate {
                cart,
                total,
                values: form,
                field_errors: Vec::new(),
                name: user.name,
                role: user.role.to_string(),
                error: e.to_string(),
                success: String::new(),
            }
            .into_response())
        }
        Err(CheckoutError::Store(e)) => {
            // Unexpected order-processing failure: full detail to the log,
            // a generic notice to the user, cart kept for retry.
            tracing::error!(error = %e, "Order processing failed");
            let total = cart.total();
            Ok(OrdersTemplate {
                cart,
                total,
                values: form,
                field_errors: Vec::new(),
                name: user.name,
                role: user.role.to_string(),
                error: "Order could not be processed. Please try again.".to_owned(),
                success: String::new(),
            }
            .into_response())
        }
    }
}
