//! Product catalog route handlers.
//!
//! Listing with substring search, plus add and edit forms. All pages are
//! gated to `{Admin, Pharmacist}`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use apotheca_core::{Category, Money, ProductId, Role};

use crate::db::{ProductRepository, StoreError};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{Referer, RequireAuth, require_role};
use crate::models::{NewProduct, Product};
use crate::state::AppState;

/// Roles allowed to manage the catalog.
const CATALOG_ROLES: &[Role] = &[Role::Admin, Role::Pharmacist];

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Product form data; everything arrives as text and is validated here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub manufacturer: String,
}

impl ProductForm {
    /// Validate the form into a [`NewProduct`].
    ///
    /// # Errors
    ///
    /// Returns the first failing field's message.
    fn validate(&self) -> Result<NewProduct, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required.".to_owned());
        }
        let brand = self.brand.trim();
        if brand.is_empty() {
            return Err("Brand is required.".to_owned());
        }
        let category: Category = self
            .category
            .parse()
            .map_err(|_| "Choose a category.".to_owned())?;
        let price: Decimal = self
            .price
            .trim()
            .parse()
            .map_err(|_| "Price must be a decimal number.".to_owned())?;
        if price < Decimal::ZERO {
            return Err("Price cannot be negative.".to_owned());
        }
        let quantity: i64 = self
            .quantity
            .trim()
            .parse()
            .map_err(|_| "Quantity must be a whole number.".to_owned())?;
        if quantity < 0 {
            return Err("Quantity cannot be negative.".to_owned());
        }
        let expiry_date = NaiveDate::parse_from_str(self.expiry_date.trim(), "%Y-%m-%d")
            .map_err(|_| "Expiry date must be YYYY-MM-DD.".to_owned())?;
        let manufacturer = self.manufacturer.trim();
        if manufacturer.is_empty() {
            return Err("Manufacturer is required.".to_owned());
        }

        Ok(NewProduct {
            name: name.to_owned(),
            brand: brand.to_owned(),
            category,
            price: Money::cedis(price),
            quantity_in_stock: quantity,
            expiry_date,
            manufacturer: manufacturer.to_owned(),
        })
    }

    /// Refill the form from a stored product for the edit page.
    fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            brand: product.brand.clone(),
            category: product.category.as_str().to_owned(),
            price: product.price.amount.to_string(),
            quantity: product.quantity_in_stock.to_string(),
            expiry_date: product.expiry_date.to_string(),
            manufacturer: product.manufacturer.clone(),
        }
    }
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub products: Vec<Product>,
    pub search_query: String,
    pub name: String,
    pub role: String,
    pub error: String,
    pub success: String,
}

/// Add/edit product form template.
#[derive(Template, WebTemplate)]
#[template(path = "product_form.html")]
pub struct ProductFormTemplate {
    pub heading: String,
    pub form_action: String,
    pub values: ProductForm,
    pub name: String,
    pub role: String,
    pub error: String,
    pub success: String,
}

/// Display the catalog, optionally filtered by a name fragment.
pub async fn index(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Query(query): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    require_role(&user, CATALOG_ROLES, referer.as_deref())?;

    let repo = ProductRepository::new(state.store());
    let search_query = query.search.unwrap_or_default();
    let products = if search_query.trim().is_empty() {
        repo.list_all().await?
    } else {
        repo.search(search_query.trim()).await?
    };

    let error = match query.error.as_deref() {
        Some("not_found") => "Product not found.",
        Some("permission") => "You do not have permission to access that page.",
        _ => "",
    };
    let success = match query.success.as_deref() {
        Some("updated") => "Product updated successfully.",
        _ => "",
    };

    Ok(ProductsTemplate {
        products,
        search_query,
        name: user.name,
        role: user.role.to_string(),
        error: error.to_owned(),
        success: success.to_owned(),
    }
    .into_response())
}

/// Display the add-product form.
pub async fn add_page(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    require_role(&user, CATALOG_ROLES, referer.as_deref())?;

    let success = match query.success.as_deref() {
        Some("created") => "Product added successfully.",
        _ => "",
    };

    Ok(ProductFormTemplate {
        heading: "Add Product".to_owned(),
        form_action: "/add".to_owned(),
        values: ProductForm::default(),
        name: user.name,
        role: user.role.to_string(),
        error: String::new(),
        success: success.to_owned(),
    }
    .into_response())
}

/// Handle the add-product form submission.
pub async fn add_submit(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    require_role(&user, CATALOG_ROLES, referer.as_deref())?;

    match form.validate() {
        Ok(product) => {
            ProductRepository::new(state.store()).create(&product).await?;
            Ok(Redirect::to("/add?success=created").into_response())
        }
        Err(message) => Ok(ProductFormTemplate {
            heading: "Add Product".to_owned(),
            form_action: "/add".to_owned(),
            values: form,
            name: user.name,
            role: user.role.to_string(),
            error: message,
            success: String::new(),
        }
        .into_response()),
    }
}

/// Display the edit form for one product.
pub async fn edit_page(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Path(product_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    require_role(&user, CATALOG_ROLES, referer.as_deref())?;

    let repo = ProductRepository::new(state.store());
    let Some(product) = repo.get_by_id(ProductId::new(product_id)).await? else {
        return Ok(Redirect::to("/products?error=not_found").into_response());
    };

    Ok(ProductFormTemplate {
        heading: "Edit Product".to_owned(),
        form_action: format!("/edit-product/{product_id}"),
        values: ProductForm::from_product(&product),
        name: user.name,
        role: user.role.to_string(),
        error: String::new(),
        success: String::new(),
    }
    .into_response())
}

/// Handle the edit-product form submission.
pub async fn edit_submit(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Path(product_id): Path<i64>,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    require_role(&user, CATALOG_ROLES, referer.as_deref())?;

    match form.validate() {
        Ok(product) => {
            let repo = ProductRepository::new(state.store());
            match repo.update(ProductId::new(product_id), &product).await {
                Ok(()) => Ok(Redirect::to("/products?success=updated").into_response()),
                Err(StoreError::NotFound) => {
                    Ok(Redirect::to("/products?error=not_found").into_response())
                }
                Err(other) => Err(other.into()),
            }
        }
        Err(message) => Ok(ProductFormTemplate {
            heading: "Edit Product".to_owned(),
            form_action: format!("/edit-product/{product_id}"),
            values: form,
            name: user.name,
            role: user.role.to_string(),
            error: message,
            success: String::new(),
        }
        .into_response()),
    }
}
