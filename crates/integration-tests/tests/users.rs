//! Staff account tests: registration, uniqueness, and login.

#![allow(clippy::unwrap_used)]

use apotheca_core::Role;
use apotheca_integration_tests::TestContext;
use apotheca_server::services::auth::{AuthError, AuthService};

#[tokio::test]
async fn duplicate_email_is_rejected_and_no_row_is_written() {
    let ctx = TestContext::new().await;
    let auth = AuthService::new(&ctx.store);

    auth.register("Kofi", "kofi@pharmacy.example", "qwerty12", Role::Pharmacist, "0241234567")
        .await
        .unwrap();

    let err = auth
        .register("Impostor", "kofi@pharmacy.example", "hunter22", Role::Cashier, "0247654321")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::UserAlreadyExists));
    assert_eq!(ctx.users().list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn register_then_login_roundtrip() {
    let ctx = TestContext::new().await;
    let auth = AuthService::new(&ctx.store);

    let created = auth
        .register("Kofi", "kofi@pharmacy.example", "qwerty12", Role::Pharmacist, "0241234567")
        .await
        .unwrap();

    let user = auth.login("kofi@pharmacy.example", "qwerty12").await.unwrap();
    assert_eq!(user.id, created.id);
    assert_eq!(user.role, Role::Pharmacist);

    let err = auth
        .login("kofi@pharmacy.example", "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let err = auth
        .login("nobody@pharmacy.example", "qwerty12")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn short_password_is_rejected() {
    let ctx = TestContext::new().await;
    let auth = AuthService::new(&ctx.store);

    let err = auth
        .register("Kofi", "kofi@pharmacy.example", "short1", Role::Cashier, "0241234567")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::WeakPassword(_)));
    assert!(ctx.users().list_all().await.unwrap().is_empty());
}
