//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Health check
//!
//! # Auth
//! GET  /                         - Login page
//! POST /                         - Login action
//! GET  /logout                   - Logout
//!
//! # Dashboard & reports (any authenticated role)
//! GET  /dashboard                - Dashboard with catalog size
//! GET  /reports                  - Reports page
//!
//! # Catalog (Admin, Pharmacist)
//! GET  /products                 - Product listing (?search= substring)
//! GET  /add                      - Add-product form
//! POST /add                      - Add-product action
//! GET  /edit-product/{id}        - Edit-product form
//! POST /edit-product/{id}        - Edit-product action
//!
//! # Cart (Admin, Pharmacist)
//! GET  /cart                     - Cart page (?search= product picker)
//! POST /add_to_cart              - Add item to the session cart
//! POST /remove_from_cart         - Remove item from the session cart
//!
//! # Checkout & sales (Admin, Cashier)
//! GET  /orders                   - Checkout form
//! POST /orders                   - Place the order
//! GET  /sales                    - Recorded sales
//!
//! # Settings (Admin)
//! GET  /settings                 - Redirect to the user list
//! GET  /settings/edit-users      - Staff account list
//! GET  /edit-user/{id}           - Edit-account form
//! POST /edit-user/{id}           - Edit-account action
//! GET  /delete-user/{id}         - Delete an account
//! GET  /settings/setup-profile   - New-account form
//! POST /settings/setup-profile   - Create an account
//! GET  /settings/user_info       - Profile list
//! GET  /view_user_info/{id}      - Display a profile
//! GET  /add_user_info/{id}       - Add-profile form
//! POST /add_user_info/{id}       - Add-profile action
//! GET  /edit_user_info/{id}      - Edit-profile form
//! POST /edit_user_info/{id}      - Edit-profile action
//! ```

pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod sales;
pub mod settings;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Assemble the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        // Dashboard & reports
        .route("/dashboard", get(dashboard::dashboard))
        .route("/reports", get(dashboard::reports))
        // Catalog
        .route("/products", get(products::index))
        .route("/add", get(products::add_page).post(products::add_submit))
        .route(
            "/edit-product/{id}",
            get(products::edit_page).post(products::edit_submit),
        )
        // Cart
        .route("/cart", get(cart::show))
        .route("/add_to_cart", post(cart::add))
        .route("/remove_from_cart", post(cart::remove))
        // Checkout & sales
        .route("/orders", get(orders::page).post(orders::submit))
        .route("/sales", get(sales::index))
        // Settings
        .route("/settings", get(settings::root))
        .route("/settings/edit-users", get(settings::edit_users))
        .route(
            "/edit-user/{id}",
            get(settings::edit_user_page).post(settings::edit_user_submit),
        )
        .route("/delete-user/{id}", get(settings::delete_user))
        .route(
            "/settings/setup-profile",
            get(settings::setup_profile_page).post(settings::setup_profile_submit),
        )
        .route("/settings/user_info", get(settings::user_info_list))
        .route("/view_user_info/{id}", get(settings::view_user_info))
        .route(
            "/add_user_info/{id}",
            get(settings::add_user_info_page).post(settings::add_user_info_submit),
        )
        .route(
            "/edit_user_info/{id}",
            get(settings::edit_user_info_page).post(settings::edit_user_info_submit),
        )
}
