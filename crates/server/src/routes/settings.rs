//! Settings and user-administration route handlers.
//!
//! Everything under `/settings`, plus the per-user edit/delete/profile
//! pages, is Admin-only.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;

use apotheca_core::{Email, Phone, Role, UserId};

use crate::db::{StoreError, UserInfoRepository, UserRepository};
use crate::error::AppError;
use crate::middleware::{Referer, RequireAuth, require_role};
use crate::models::{NewProfile, User, UserProfile};
use crate::routes::auth::MessageQuery;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Roles allowed into settings.
const SETTINGS_ROLES: &[Role] = &[Role::Admin];

/// Accepted gender choices.
const GENDERS: &[&str] = &["Male", "Female"];

/// Accepted marital status choices.
const MARITAL_STATUSES: &[&str] = &["Single", "Married", "Divorced", "Separated"];

// =============================================================================
// Forms
// =============================================================================

/// New staff account form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUserForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub contact: String,
}

/// Edit user form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditUserForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact: String,
}

/// Staff profile form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub home_address: String,
    #[serde(default)]
    pub marital_status: String,
}

impl ProfileForm {
    /// Validate the form into a [`NewProfile`].
    ///
    /// # Errors
    ///
    /// Returns the first failing field's message.
    fn validate(&self) -> Result<NewProfile, String> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let middle_name = self.middle_name.trim();
        if first_name.is_empty() || last_name.is_empty() || middle_name.is_empty() {
            return Err("First, last, and middle names are required.".to_owned());
        }
        let date_of_birth = NaiveDate::parse_from_str(self.dob.trim(), "%Y-%m-%d")
            .map_err(|_| "Date of birth must be YYYY-MM-DD.".to_owned())?;
        let email = Email::parse(self.email.trim()).map_err(|e| e.to_string())?;
        if !GENDERS.contains(&self.gender.as_str()) {
            return Err("Choose a gender.".to_owned());
        }
        let home_address = self.home_address.trim();
        if home_address.is_empty() {
            return Err("Home address is required.".to_owned());
        }
        if !MARITAL_STATUSES.contains(&self.marital_status.as_str()) {
            return Err("Choose a marital status.".to_owned());
        }

        Ok(NewProfile {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            middle_name: middle_name.to_owned(),
            date_of_birth,
            email,
            gender: self.gender.clone(),
            home_address: home_address.to_owned(),
            marital_status: self.marital_status.clone(),
        })
    }

    /// Refill the form from a stored profile.
    fn from_profile(profile: &UserProfile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            middle_name: profile.middle_name.clone(),
            dob: profile.date_of_birth.to_string(),
            email: profile.email.as_str().to_owned(),
            gender: profile.gender.clone(),
            home_address: profile.home_address.clone(),
            marital_status: profile.marital_status.clone(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// User list (settings) template.
#[derive(Template, WebTemplate)]
#[template(path = "settings_users.html")]
pub struct SettingsUsersTemplate {
    pub users: Vec<User>,
    pub name: String,
    pub role: String,
    pub error: String,
    pub success: String,
}

/// New-account form template.
#[derive(Template, WebTemplate)]
#[template(path = "setup_profile.html")]
pub struct SetupProfileTemplate {
    pub values: NewUserForm,
    pub name: String,
    pub role: String,
    pub error: String,
}

/// Edit-user form template.
#[derive(Template, WebTemplate)]
#[template(path = "edit_user.html")]
pub struct EditUserTemplate {
    pub user_id: i64,
    pub values: EditUserForm,
    pub name: String,
    pub role: String,
    pub error: String,
}

/// Profile list template.
#[derive(Template, WebTemplate)]
#[template(path = "settings_user_info.html")]
pub struct UserInfoListTemplate {
    pub users: Vec<User>,
    pub name: String,
    pub role: String,
    pub error: String,
    pub success: String,
}

/// Profile add/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "profile_form.html")]
pub struct ProfileFormTemplate {
    pub heading: String,
    pub form_action: String,
    pub values: ProfileForm,
    pub name: String,
    pub role: String,
    pub error: String,
}

/// Profile display template.
#[derive(Template, WebTemplate)]
#[template(path = "view_user_info.html")]
pub struct ViewUserInfoTemplate {
    pub profile: UserProfile,
    pub name: String,
    pub role: String,
}

// =============================================================================
// User Administration
// =============================================================================

/// `/settings` lands on the user list.
pub async fn root(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
) -> Result<Response, AppError> {
    require_role(&user, SETTINGS_ROLES, referer.as_deref())?;
    Ok(Redirect::to("/settings/edit-users").into_response())
}

/// List every staff account.
pub async fn edit_users(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Query(query): Query<MessageQuery>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    require_role(&user, SETTINGS_ROLES, referer.as_deref())?;

    let users = UserRepository::new(state.store()).list_all().await?;

    let error = match query.error.as_deref() {
        Some("not_found") => "User not found.",
        Some("permission") => "You do not have permission to access that page.",
        _ => "",
    };
    let success = match query.success.as_deref() {
        Some("user_updated") => "User updated successfully.",
        Some("user_deleted") => "User deleted successfully.",
        Some("user_created") => "User added successfully.",
        _ => "",
    };

    Ok(SettingsUsersTemplate {
        users,
        name: user.name,
        role: user.role.to_string(),
        error: error.to_owned(),
        success: success.to_owned(),
    }
    .into_response())
}

/// Display the edit form for one account.
pub async fn edit_user_page(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    require_role(&user, SETTINGS_ROLES, referer.as_deref())?;

    let repo = UserRepository::new(state.store());
    let Some(target) = repo.get_by_id(UserId::new(user_id)).await? else {
        return Ok(Redirect::to("/settings/edit-users?error=not_found").into_response());
    };

    Ok(EditUserTemplate {
        user_id,
        values: EditUserForm {
            name: target.name,
            email: target.email.into_inner(),
            contact: target.contact.into_inner(),
        },
        name: user.name,
        role: user.role.to_string(),
        error: String::new(),
    }
    .into_response())
}

/// Handle the edit-user submission.
pub async fn edit_user_submit(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
    Form(form): Form<EditUserForm>,
) -> Result<Response, AppError> {
    require_role(&user, SETTINGS_ROLES, referer.as_deref())?;

    let rerender = |message: String, form: EditUserForm, user_name: String, role: String| {
        EditUserTemplate {
            user_id,
            values: form,
            name: user_name,
            role,
            error: message,
        }
        .into_response()
    };

    let name = form.name.trim().to_owned();
    if name.is_empty() {
        return Ok(rerender(
            "Name is required.".to_owned(),
            form,
            user.name,
            user.role.to_string(),
        ));
    }
    let email = match Email::parse(form.email.trim()) {
        Ok(email) => email,
        Err(e) => {
            return Ok(rerender(e.to_string(), form, user.name, user.role.to_string()));
        }
    };
    let contact = match Phone::parse(form.contact.trim()) {
        Ok(contact) => contact,
        Err(_) => {
            return Ok(rerender(
                "Invalid phone number format.".to_owned(),
                form,
                user.name,
                user.role.to_string(),
            ));
        }
    };

    let repo = UserRepository::new(state.store());
    match repo
        .update_contact(UserId::new(user_id), &name, &email, &contact)
        .await
    {
        Ok(()) => Ok(Redirect::to("/settings/edit-users?success=user_updated").into_response()),
        Err(StoreError::NotFound) => {
            Ok(Redirect::to("/settings/edit-users?error=not_found").into_response())
        }
        Err(other) => Err(other.into()),
    }
}

/// Delete a staff account.
pub async fn delete_user(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    require_role(&user, SETTINGS_ROLES, referer.as_deref())?;

    let repo = UserRepository::new(state.store());
    match repo.delete(UserId::new(user_id)).await {
        Ok(()) => Ok(Redirect::to("/settings/edit-users?success=user_deleted").into_response()),
        Err(StoreError::NotFound) => {
            Ok(Redirect::to("/settings/edit-users?error=not_found").into_response())
        }
        Err(other) => Err(other.into()),
    }
}

/// Display the new-account form.
pub async fn setup_profile_page(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
) -> Result<Response, AppError> {
    require_role(&user, SETTINGS_ROLES, referer.as_deref())?;

    Ok(SetupProfileTemplate {
        values: NewUserForm::default(),
        name: user.name,
        role: user.role.to_string(),
        error: String::new(),
    }
    .into_response())
}

/// Handle the new-account submission.
///
/// Email uniqueness is checked by the repository's pre-check read; a
/// duplicate comes back as a form error.
pub async fn setup_profile_submit(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    State(state): State<AppState>,
    Form(form): Form<NewUserForm>,
) -> Result<Response, AppError> {
    require_role(&user, SETTINGS_ROLES, referer.as_deref())?;

    let rerender = |message: String, form: NewUserForm, user_name: String, role: String| {
        SetupProfileTemplate {
            values: form,
            name: user_name,
            role,
            error: message,
        }
        .into_response()
    };

    if form.password != form.confirm_password {
        return Ok(rerender(
            "Passwords must match.".to_owned(),
            form,
            user.name,
            user.role.to_string(),
        ));
    }
    let Ok(role) = form.role.parse::<Role>() else {
        return Ok(rerender(
            "Choose a role.".to_owned(),
            form,
            user.name,
            user.role.to_string(),
        ));
    };

    let auth = AuthService::new(state.store());
    match auth
        .register(form.name.trim(), form.email.trim(), &form.password, role, form.contact.trim())
        .await
    {
        Ok(created) => {
            tracing::info!(user = %created.email, role = %created.role, "Staff account created");
            Ok(Redirect::to("/settings/edit-users?success=user_created").into_response())
        }
        Err(AuthError::UserAlreadyExists) => Ok(rerender(
            "This email address is already in use. Please choose a different email.".to_owned(),
            form,
            user.name,
            user.role.to_string(),
        )),
        Err(AuthError::WeakPassword(message)) => {
            Ok(rerender(message, form, user.name, user.role.to_string()))
        }
        Err(AuthError::InvalidEmail(e)) => {
            Ok(rerender(e.to_string(), form, user.name, user.role.to_string()))
        }
        Err(AuthError::InvalidPhone(_)) => Ok(rerender(
            "Invalid phone number format.".to_owned(),
            form,
            user.name,
            user.role.to_string(),
        )),
        Err(other) => Err(other.into()),
    }
}

// =============================================================================
// Staff Profiles (user_info)
// =============================================================================

/// List accounts with profile actions.
pub async fn user_info_list(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Query(query): Query<MessageQuery>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    require_role(&user, SETTINGS_ROLES, referer.as_deref())?;

    let users = UserRepository::new(state.store()).list_all().await?;

    let error = match query.error.as_deref() {
        Some("profile_missing") => "User information not found.",
        Some("permission") => "You do not have permission to access that page.",
        _ => "",
    };
    let success = match query.success.as_deref() {
        Some("profile_added") => "User information added successfully.",
        Some("profile_updated") => "User info updated successfully.",
        _ => "",
    };

    Ok(UserInfoListTemplate {
        users,
        name: user.name,
        role: user.role.to_string(),
        error: error.to_owned(),
        success: success.to_owned(),
    }
    .into_response())
}

/// Display one account's profile.
pub async fn view_user_info(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    require_role(&user, SETTINGS_ROLES, referer.as_deref())?;

    let repo = UserInfoRepository::new(state.store());
    let Some(profile) = repo.get_by_user(UserId::new(user_id)).await? else {
        return Ok(Redirect::to("/settings/user_info?error=profile_missing").into_response());
    };

    Ok(ViewUserInfoTemplate {
        profile,
        name: user.name,
        role: user.role.to_string(),
    }
    .into_response())
}

/// Display the add-profile form, unless the account already has one.
pub async fn add_user_info_page(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    require_role(&user, SETTINGS_ROLES, referer.as_deref())?;

    let repo = UserInfoRepository::new(state.store());
    if repo.get_by_user(UserId::new(user_id)).await?.is_some() {
        // At most one profile per account; send the admin to the editor.
        return Ok(Redirect::to(&format!("/edit_user_info/{user_id}")).into_response());
    }

    Ok(ProfileFormTemplate {
        heading: "Add Information".to_owned(),
        form_action: format!("/add_user_info/{user_id}"),
        values: ProfileForm::default(),
        name: user.name,
        role: user.role.to_string(),
        error: String::new(),
    }
    .into_response())
}

/// Handle the add-profile submission.
pub async fn add_user_info_submit(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    require_role(&user, SETTINGS_ROLES, referer.as_deref())?;

    match form.validate() {
        Ok(profile) => {
            let repo = UserInfoRepository::new(state.store());
            match repo.create(UserId::new(user_id), &profile).await {
                Ok(_) => Ok(
                    Redirect::to("/settings/user_info?success=profile_added").into_response()
                ),
                Err(StoreError::Conflict(_)) => {
                    Ok(Redirect::to(&format!("/edit_user_info/{user_id}")).into_response())
                }
                Err(other) => Err(other.into()),
            }
        }
        Err(message) => Ok(ProfileFormTemplate {
            heading: "Add Information".to_owned(),
            form_action: format!("/add_user_info/{user_id}"),
            values: form,
            name: user.name,
            role: user.role.to_string(),
            error: message,
        }
        .into_response()),
    }
}

/// Display the edit-profile form.
pub async fn edit_user_info_page(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    require_role(&user, SETTINGS_ROLES, referer.as_deref())?;

    let repo = UserInfoRepository::new(state.store());
    let Some(profile) = repo.get_by_user(UserId::new(user_id)).await? else {
        return Ok(Redirect::to("/settings/user_info?error=profile_missing").into_response());
    };

    Ok(ProfileFormTemplate {
        heading: "Edit Information".to_owned(),
        form_action: format!("/edit_user_info/{user_id}"),
        values: ProfileForm::from_profile(&profile),
        name: user.name,
        role: user.role.to_string(),
        error: String::new(),
    }
    .into_response())
}

/// Handle the edit-profile submission.
pub async fn edit_user_info_submit(
    RequireAuth(user): RequireAuth,
    Referer(referer): Referer,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    require_role(&user, SETTINGS_ROLES, referer.as_deref())?;

    match form.validate() {
        Ok(profile) => {
            let repo = UserInfoRepository::new(state.store());
            match repo.update(UserId::new(user_id), &profile).await {
                Ok(()) => Ok(
                    Redirect::to("/settings/user_info?success=profile_updated").into_response()
                ),
                Err(StoreError::NotFound) => Ok(Redirect::to(
                    "/settings/user_info?error=profile_missing",
                )
                .into_response()),
                Err(other) => Err(other.into()),
            }
        }
        Err(message) => Ok(ProfileFormTemplate {
            heading: "Edit Information".to_owned(),
            form_action: format!("/edit_user_info/{user_id}"),
            values: form,
            name: user.name,
            role: user.role.to_string(),
            error: message,
        }
        .into_response()),
    }
}
