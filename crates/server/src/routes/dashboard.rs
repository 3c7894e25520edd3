//! Dashboard and reports route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::IntoResponse;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::auth::MessageQuery;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub name: String,
    pub role: String,
    pub total_products: usize,
    pub error: String,
}

/// Display the dashboard with the catalog size.
pub async fn dashboard(
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let total_products = ProductRepository::new(state.store()).count().await?;

    let error = match query.error.as_deref() {
        Some("permission") => "You do not have permission to access that page.",
        _ => "",
    };

    Ok(DashboardTemplate {
        name: user.name,
        role: user.role.to_string(),
        total_products,
        error: error.to_owned(),
    })
}

/// Reports page template.
#[derive(Template, WebTemplate)]
#[template(path = "reports.html")]
pub struct ReportsTemplate {
    pub name: String,
    pub role: String,
}

/// Display the reports page. Open to every authenticated role.
pub async fn reports(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    ReportsTemplate {
        name: user.name,
        role: user.role.to_string(),
    }
}
