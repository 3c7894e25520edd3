//! Product domain types.

use chrono::NaiveDate;

use apotheca_core::{Category, Money, ProductId};

/// A catalog product (domain type).
///
/// `quantity_in_stock` is a mutable counter: catalog edits set it, checkout
/// decrements it, and it never drops below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name, the key cart lookups use.
    pub name: String,
    /// Brand name.
    pub brand: String,
    /// Shelf category.
    pub category: Category,
    /// Unit price.
    pub price: Money,
    /// Units currently on the shelf.
    pub quantity_in_stock: i64,
    /// Expiry date printed on the packaging.
    pub expiry_date: NaiveDate,
    /// Manufacturer name.
    pub manufacturer: String,
}

/// Field set for creating or fully updating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub category: Category,
    pub price: Money,
    pub quantity_in_stock: i64,
    pub expiry_date: NaiveDate,
    pub manufacturer: String,
}
