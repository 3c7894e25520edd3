//! Cart route handlers.
//!
//! The cart is owned by the session: every handler loads it, mutates it
//! through the cart service, and writes it back. It never touches durable
//! storage.

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

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::middleware::{Referer, RequireAuth, require_role};
use crate::models::{Cart, Product, session_keys};
use crate::services::cart::{CartError, CartService};
use crate::state::AppState;

/// Roles allowed to build carts.
const CART_ROLES: &[Role] = &[Role::Admin, Role::Pharmacist];

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the session's cart, or an empty one.
pub(crate) async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Drop the session's cart.
pub(crate) async fn clear_cart(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Cart>(session_keys::CART).await?;
    Ok(())
}

// =============================================================================
// Forms & Queries
// =============================================================================

/// Query parameters for the cart page.
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub search: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub product_name: String,
    pub quantity: Option<u32>,
}

/// Remove-from-cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_name: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub cart: Cart,
    pub total: Money,
    pub product_names: Vec<String>,
    pub found: Vec<Product>,
    pub search_query: String,
    pub name: String,
    pub role: String,
    pub error: String,
    pub success: String,
}

/// Display the cart page with the product picker.
pub async fn show(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Query(query): Query<CartQuery>,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    require_role(&user, CART_ROLES, referer.as_deref())?;

    let repo = ProductRepository::new(state.store());
    let cart = load_cart(&session).await;

    let search_query = query.search.unwrap_or_default();
    let found = if search_query.trim().is_empty() {
        Vec::new()
    } else {
        repo.search(search_query.trim()).await?
    };

    let product_names = repo
        .list_all()
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();

    let error = match query.error.as_deref() {
        Some("missing_product") => "Please select a product.".to_owned(),
        Some("permission") => "You do not have permission to access that page.".to_owned(),
        Some(detail) => detail.to_owned(),
        None => String::new(),
    };
    let success = match query.success.as_deref() {
        Some("added") => "Item added to cart successfully.",
        Some("removed") => "Item removed from cart.",
        _ => "",
    };

    let total = cart.total();
    Ok(CartTemplate {
        cart,
        total,
        product_names,
        found,
        search_query,
        name: user.name,
        role: user.role.to_string(),
        error,
        success: success.to_owned(),
    }
    .into_response())
}

/// Add an item to the session cart.
///
/// Stock is checked against the live counter and the price is snapshotted
/// onto the line; checkout will not re-price it.
pub async fn add(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    require_role(&user, CART_ROLES, referer.as_deref())?;

    if form.product_name.is_empty() {
        return Ok(Redirect::to("/cart?error=missing_product").into_response());
    }
    let quantity = form.quantity.unwrap_or(1);

    let mut cart = load_cart(&session).await;
    let service = CartService::new(state.store());

    match service.add(&mut cart, &form.product_name, quantity).await {
        Ok(()) => {
            save_cart(&session, &cart).await?;
            Ok(Redirect::to("/cart?success=added").into_response())
        }
        Err(e @ (CartError::NotFound(_) | CartError::InsufficientStock { .. } | CartError::ZeroQuantity)) => {
            let notice = urlencode(&e.to_string());
            Ok(Redirect::to(&format!("/cart?error={notice}")).into_response())
        }
        Err(CartError::Store(e)) => Err(e.into()),
    }
}

/// Remove every line with the submitted product name. A miss is a no-op.
pub async fn remove(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response, AppError> {
    require_role(&user, CART_ROLES, referer.as_deref())?;

    let mut cart = load_cart(&session).await;
    CartService::remove(&mut cart, &form.product_name);
    save_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart?success=removed").into_response())
}

/// Percent-encode a notice for a redirect query parameter.
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlencode_spaces_and_punctuation() {
        assert_eq!(urlencode("product not found: X"), "product+not+found%3A+X");
        assert_eq!(urlencode("plain-text_1.0~ok"), "plain-text_1.0~ok");
    }
}
