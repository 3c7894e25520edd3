//! Data store contract tests over the real migrated schema.

#![allow(clippy::unwrap_used)]

use apotheca_integration_tests::TestContext;
use apotheca_server::db::{ProductRepository, StoreError, Value};

#[tokio::test]
async fn read_on_empty_tables_returns_empty_vec() {
    let ctx = TestContext::new().await;

    for table in ["products", "customers", "sales", "users", "user_info"] {
        let rows = ctx.store.read(table, None, None, false).await.unwrap();
        assert!(rows.is_empty(), "{table} should start empty");
    }
}

#[tokio::test]
async fn read_with_unmatched_filter_returns_empty_vec() {
    let ctx = TestContext::new().await;
    ctx.seed_product("Paracetamol", "5.00", 10).await;

    let rows = ctx
        .store
        .read(
            "products",
            Some(&[("name", Value::from("Unobtainium"))]),
            None,
            false,
        )
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn empty_filter_mutations_are_rejected_and_change_nothing() {
    let ctx = TestContext::new().await;
    let product_id = ctx.seed_product("Paracetamol", "5.00", 10).await;

    let err = ctx
        .store
        .update("products", &[("quantity_in_stock", Value::from(0_i64))], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UnsafeOperation(_)));

    let err = ctx.store.delete("products", &[]).await.unwrap_err();
    assert!(matches!(err, StoreError::UnsafeOperation(_)));

    // The catalog row is intact.
    let product = ProductRepository::new(&ctx.store)
        .get_by_id(product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.quantity_in_stock, 10);
}

#[tokio::test]
async fn like_search_matches_substrings() {
    let ctx = TestContext::new().await;
    ctx.seed_product("Paracetamol", "5.00", 10).await;
    ctx.seed_product("Paraffin Gauze", "3.50", 10).await;
    ctx.seed_product("Ibuprofen", "8.00", 10).await;

    let repo = ProductRepository::new(&ctx.store);
    let hits = repo.search("para").await.unwrap();
    assert_eq!(hits.len(), 2);

    let hits = repo.search("zzz").await.unwrap();
    assert!(hits.is_empty());
}
