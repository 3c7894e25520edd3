//! Sales history route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use apotheca_core::Role;

use crate::db::SaleRepository;
use crate::error::AppError;
use crate::middleware::{Referer, RequireAuth, require_role};
use crate::models::Sale;
use crate::state::AppState;

/// Roles allowed to read the sales log.
const SALES_ROLES: &[Role] = &[Role::Admin, Role::Cashier];

/// Sales listing template.
#[derive(Template, WebTemplate)]
#[template(path = "sales.html")]
pub struct SalesTemplate {
    pub sales: Vec<Sale>,
    pub name: String,
    pub role: String,
}

/// Display every recorded sale.
pub async fn index(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    require_role(&user, SALES_ROLES, referer.as_deref())?;

    let sales = SaleRepository::new(state.store()).list_all().await?;

    Ok(SalesTemplate {
        sales,
        name: user.name,
        role: user.role.to_string(),
    }
    .into_response())
}
