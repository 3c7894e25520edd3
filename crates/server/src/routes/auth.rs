//! Login and logout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: String,
    pub success: String,
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    let error = match query.error.as_deref() {
        Some("login_required") => "You must log in to access this page.",
        Some("credentials") => "Invalid email or password, please try again.",
        Some(_) => "Something went wrong, please try again.",
        None => "",
    };
    let success = match query.success.as_deref() {
        Some("logged_out") => "You have been logged out.",
        _ => "",
    };

    LoginTemplate {
        error: error.to_owned(),
        success: success.to_owned(),
    }
}

/// Handle login form submission.
///
/// On success the user's identity and role are cached in the session;
/// every later view reads them back from there.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.store());

    match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            let current = CurrentUser {
                id: user.id,
                email: user.email,
                name: user.name,
                role: user.role,
            };
            set_current_user(&session, &current).await?;
            tracing::info!(user = %current.email, role = %current.role, "Login");
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            Ok(Redirect::to("/?error=credentials").into_response())
        }
        Err(other) => Err(other.into()),
    }
}

/// Log out and drop the whole session, cart included.
pub async fn logout(session: Session) -> Result<Response, AppError> {
    clear_current_user(&session).await?;
    Ok(Redirect::to("/?success=logged_out").into_response())
}
