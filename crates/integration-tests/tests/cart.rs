//! Cart service tests against the live catalog.

#![allow(clippy::unwrap_used)]

use apotheca_integration_tests::TestContext;
use apotheca_server::db::ProductRepository;
use apotheca_server::models::{Cart, NewProduct};
use apotheca_server::services::cart::{CartError, CartService};

#[tokio::test]
async fn add_snapshots_price_against_later_edits() {
    let ctx = TestContext::new().await;
    let product_id = ctx.seed_product("Paracetamol", "5.00", 10).await;

    let mut cart = Cart::default();
    let service = CartService::new(&ctx.store);
    service.add(&mut cart, "Paracetamol", 2).await.unwrap();

    // Reprice the product after the line was added.
    let repo = ProductRepository::new(&ctx.store);
    let mut product = repo.get_by_id(product_id).await.unwrap().unwrap();
    product.price = apotheca_core::Money::cedis("9.99".parse().unwrap());
    repo.update(
        product_id,
        &NewProduct {
            name: product.name.clone(),
            brand: product.brand.clone(),
            category: product.category,
            price: product.price,
            quantity_in_stock: product.quantity_in_stock,
            expiry_date: product.expiry_date,
            manufacturer: product.manufacturer.clone(),
        },
    )
    .await
    .unwrap();

    // The line still carries the price the attendant saw.
    assert_eq!(cart.lines()[0].unit_price.amount.to_string(), "5.00");
    assert_eq!(cart.total().amount.to_string(), "10.00");
}

#[tokio::test]
async fn add_unknown_product_is_not_found() {
    let ctx = TestContext::new().await;

    let mut cart = Cart::default();
    let err = CartService::new(&ctx.store)
        .add(&mut cart, "Unobtainium", 1)
        .await
        .unwrap_err();

    assert!(matches!(err, CartError::NotFound(_)));
    assert!(cart.is_empty());
}

#[tokio::test]
async fn add_beyond_stock_is_rejected_at_add_time() {
    let ctx = TestContext::new().await;
    ctx.seed_product("Paracetamol", "5.00", 3).await;

    let mut cart = Cart::default();
    let err = CartService::new(&ctx.store)
        .add(&mut cart, "Paracetamol", 4)
        .await
        .unwrap_err();

    match err {
        CartError::InsufficientStock {
            requested,
            available,
            ..
        } => {
            assert_eq!(requested, 4);
            assert_eq!(available, 3);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
    assert!(cart.is_empty());
}

#[tokio::test]
async fn totals_track_adds_and_removes() {
    let ctx = TestContext::new().await;
    ctx.seed_product("Paracetamol", "5.00", 10).await;
    ctx.seed_product("Gauze", "1.25", 10).await;

    let mut cart = Cart::default();
    let service = CartService::new(&ctx.store);

    assert_eq!(cart.total().amount.to_string(), "0");

    service.add(&mut cart, "Paracetamol", 2).await.unwrap();
    service.add(&mut cart, "Gauze", 4).await.unwrap();
    assert_eq!(cart.total().amount.to_string(), "15.00");

    CartService::remove(&mut cart, "Gauze");
    assert_eq!(cart.total().amount.to_string(), "10.00");

    CartService::remove(&mut cart, "Paracetamol");
    assert_eq!(cart.total().amount.to_string(), "0");
    assert!(cart.is_empty());
}
