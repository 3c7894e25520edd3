//! End-to-end checkout workflow tests.
//!
//! Each test runs the real services against a migrated in-memory
//! database; nothing is mocked except the invoice generator where the
//! failure path is under test.

#![allow(clippy::unwrap_used)]

use apotheca_integration_tests::{FailingInvoiceGenerator, TestContext};
use apotheca_server::db::{CustomerRepository, SaleRepository};
use apotheca_server::models::Cart;
use apotheca_server::services::cart::CartService;
use apotheca_server::services::checkout::{CheckoutError, CheckoutRequest, CheckoutService};
use apotheca_server::services::invoice::HtmlInvoiceGenerator;

fn valid_customer() -> CheckoutRequest {
    CheckoutRequest {
        full_name: "Ama Mensah".to_owned(),
        phone: "+233201234567".to_owned(),
        email: String::new(),
        address: String::new(),
        payment_method: "cash".to_owned(),
        comments: "Take after meals".to_owned(),
    }
}

fn temp_invoice_dir(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("apotheca-it-{tag}"))
}

#[tokio::test]
async fn end_to_end_checkout_records_everything() {
    let ctx = TestContext::new().await;
    let product_id = ctx.seed_product("Paracetamol", "5.00", 10).await;
    let attendant = ctx.seed_attendant("cashier@pharmacy.example").await;

    let mut cart = Cart::default();
    CartService::new(&ctx.store)
        .add(&mut cart, "Paracetamol", 2)
        .await
        .unwrap();

    let invoice_dir = temp_invoice_dir("e2e");
    let invoices = HtmlInvoiceGenerator::new(&invoice_dir);
    let receipt = CheckoutService::new(&ctx.store, &invoices)
        .place_order(attendant, &cart, &valid_customer())
        .await
        .unwrap();

    // Invoice number has the INV<unix_timestamp> shape.
    assert!(receipt.invoice_number.starts_with("INV"));
    assert!(receipt.invoice_number[3..].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(receipt.total.amount.to_string(), "10.00");
    assert!(receipt.invoice_error.is_none());
    assert!(receipt.invoice_path.as_ref().unwrap().exists());

    // One customer row.
    let customers = CustomerRepository::new(&ctx.store).list_all().await.unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].full_name, "Ama Mensah");

    // One sale row with the computed total.
    let sales = SaleRepository::new(&ctx.store).list_all().await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].total.amount.to_string(), "10.00");
    assert_eq!(sales[0].invoice_number, receipt.invoice_number);
    assert_eq!(sales[0].attendant, attendant);

    // Stock reduced by the cart quantity.
    assert_eq!(ctx.stock_of(product_id).await, 8);

    std::fs::remove_dir_all(&invoice_dir).ok();
}

#[tokio::test]
async fn empty_cart_is_rejected_without_side_effects() {
    let ctx = TestContext::new().await;
    let attendant = ctx.seed_attendant("cashier@pharmacy.example").await;

    let invoices = HtmlInvoiceGenerator::new(temp_invoice_dir("empty"));
    let err = CheckoutService::new(&ctx.store, &invoices)
        .place_order(attendant, &Cart::default(), &valid_customer())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert!(CustomerRepository::new(&ctx.store).list_all().await.unwrap().is_empty());
    assert!(SaleRepository::new(&ctx.store).list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn bad_phone_is_rejected_and_nothing_is_written() {
    let ctx = TestContext::new().await;
    let product_id = ctx.seed_product("Paracetamol", "5.00", 10).await;
    let attendant = ctx.seed_attendant("cashier@pharmacy.example").await;

    let mut cart = Cart::default();
    CartService::new(&ctx.store)
        .add(&mut cart, "Paracetamol", 2)
        .await
        .unwrap();

    let mut request = valid_customer();
    request.phone = "not-a-phone".to_owned();

    let invoices = HtmlInvoiceGenerator::new(temp_invoice_dir("phone"));
    let err = CheckoutService::new(&ctx.store, &invoices)
        .place_order(attendant, &cart, &request)
        .await
        .unwrap_err();

    match err {
        CheckoutError::Validation(errors) => {
            assert!(errors.iter().any(|e| e.field == "phone"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }

    assert!(CustomerRepository::new(&ctx.store).list_all().await.unwrap().is_empty());
    assert!(SaleRepository::new(&ctx.store).list_all().await.unwrap().is_empty());
    assert_eq!(ctx.stock_of(product_id).await, 10);
}

#[tokio::test]
async fn stock_drop_after_add_aborts_the_order() {
    let ctx = TestContext::new().await;
    let product_id = ctx.seed_product("Paracetamol", "5.00", 5).await;
    let attendant = ctx.seed_attendant("cashier@pharmacy.example").await;

    let mut cart = Cart::default();
    CartService::new(&ctx.store)
        .add(&mut cart, "Paracetamol", 5)
        .await
        .unwrap();

    // Another cart drains the shelf before this one checks out.
    apotheca_server::db::ProductRepository::new(&ctx.store)
        .set_stock(product_id, 2)
        .await
        .unwrap();

    let invoices = HtmlInvoiceGenerator::new(temp_invoice_dir("drained"));
    let err = CheckoutService::new(&ctx.store, &invoices)
        .place_order(attendant, &cart, &valid_customer())
        .await
        .unwrap_err();

    match err {
        CheckoutError::InsufficientStock {
            requested,
            available,
            ..
        } => {
            assert_eq!(requested, 5);
            assert_eq!(available, 2);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Nothing was written and the counter is untouched.
    assert!(CustomerRepository::new(&ctx.store).list_all().await.unwrap().is_empty());
    assert!(SaleRepository::new(&ctx.store).list_all().await.unwrap().is_empty());
    assert_eq!(ctx.stock_of(product_id).await, 2);
}

#[tokio::test]
async fn repeated_checkouts_never_drive_stock_negative() {
    let ctx = TestContext::new().await;
    let product_id = ctx.seed_product("Paracetamol", "5.00", 5).await;
    let attendant = ctx.seed_attendant("cashier@pharmacy.example").await;

    let invoices = HtmlInvoiceGenerator::new(temp_invoice_dir("sequence"));
    let cart_service = CartService::new(&ctx.store);
    let checkout = CheckoutService::new(&ctx.store, &invoices);

    // Sell two at a time until the shelf can no longer cover a cart.
    let mut completed = 0;
    loop {
        let mut cart = Cart::default();
        if cart_service.add(&mut cart, "Paracetamol", 2).await.is_err() {
            break;
        }
        match checkout.place_order(attendant, &cart, &valid_customer()).await {
            Ok(_) => completed += 1,
            Err(CheckoutError::InsufficientStock { .. }) => break,
            Err(other) => panic!("unexpected failure: {other:?}"),
        }
        assert!(ctx.stock_of(product_id).await >= 0);
    }

    assert_eq!(completed, 2);
    assert_eq!(ctx.stock_of(product_id).await, 1);

    std::fs::remove_dir_all(temp_invoice_dir("sequence")).ok();
}

#[tokio::test]
async fn invoice_failure_still_records_the_sale() {
    let ctx = TestContext::new().await;
    let product_id = ctx.seed_product("Paracetamol", "5.00", 10).await;
    let attendant = ctx.seed_attendant("cashier@pharmacy.example").await;

    let mut cart = Cart::default();
    CartService::new(&ctx.store)
        .add(&mut cart, "Paracetamol", 3)
        .await
        .unwrap();

    let receipt = CheckoutService::new(&ctx.store, &FailingInvoiceGenerator)
        .place_order(attendant, &cart, &valid_customer())
        .await
        .unwrap();

    // Degraded success: the sale exists, the invoice does not.
    assert!(receipt.invoice_path.is_none());
    assert!(receipt.invoice_error.is_some());

    let sales = SaleRepository::new(&ctx.store).list_all().await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].invoice_number, receipt.invoice_number);
    assert_eq!(ctx.stock_of(product_id).await, 7);
}
