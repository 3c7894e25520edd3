//! Cart service.
//!
//! Adds products to a session-owned [`Cart`] with a live stock check and
//! a price/name snapshot. The cart itself is plain data handed in by the
//! caller; this service only contributes the catalog lookup.

use thiserror::Error;

use crate::db::{ProductRepository, Store, StoreError};
use crate::models::{Cart, CartLine};

/// Errors that can occur while editing a cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// No product with the requested name.
    #[error("product not found: {0}")]
    NotFound(String),

    /// Requested quantity must be at least one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// Requested more units than are on the shelf.
    #[error("insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        name: String,
        requested: u32,
        available: i64,
    },

    /// Database operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Cart operations backed by the product catalog.
pub struct CartService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self {
            products: ProductRepository::new(store),
        }
    }

    /// Add `quantity` units of the named product to the cart.
    ///
    /// The product is looked up by exact name; its name and unit price are
    /// snapshotted onto the new line, so later catalog edits do not change
    /// what the customer was shown. Stock is checked here, at add time.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if no product has that name,
    /// `CartError::ZeroQuantity` for a zero quantity, and
    /// `CartError::InsufficientStock` if the shelf can't cover the request.
    pub async fn add(
        &self,
        cart: &mut Cart,
        product_name: &str,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let product = self
            .products
            .get_by_name(product_name)
            .await?
            .ok_or_else(|| CartError::NotFound(product_name.to_owned()))?;

        if i64::from(quantity) > product.quantity_in_stock {
            return Err(CartError::InsufficientStock {
                name: product.name,
                requested: quantity,
                available: product.quantity_in_stock,
            });
        }

        cart.push_line(CartLine {
            product_id: product.id,
            name: product.name,
            unit_price: product.price,
            quantity,
        });
        Ok(())
    }

    /// Remove every line with the given product name. Absent names are a
    /// no-op, not an error.
    pub fn remove(cart: &mut Cart, product_name: &str) -> usize {
        cart.remove(product_name)
    }
}
