//! Snapshot survival across store instances.

#![allow(clippy::unwrap_used)]

use rocketshoes_cart::UpdateProductAmount;
use rocketshoes_cart::storage::{CartStorage, DEFAULT_CART_KEY, FileStorage};
use rocketshoes_core::ProductId;
use rocketshoes_integration_tests::TestContext;

#[tokio::test]
async fn test_cart_survives_restart() {
    let mut ctx = TestContext::new().await;
    let _s1 = ctx.stock_mock(1, 5).create_async().await;
    let _s2 = ctx.stock_mock(2, 5).create_async().await;
    let _p1 = ctx
        .product_mock(1, "Tênis de Caminhada Leve Confortável", 179.9)
        .create_async()
        .await;
    let _p2 = ctx.product_mock(2, "Tênis VR Caminhada", 139.9).create_async().await;

    let first = ctx.store();
    first.add_product(ProductId::new(2)).await.unwrap();
    first.add_product(ProductId::new(1)).await.unwrap();
    first
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(2),
            amount: 3,
        })
        .await
        .unwrap();
    let before = first.cart();
    drop(first);

    let second = ctx.store();
    assert_eq!(second.cart(), before);

    let ids: Vec<_> = second.cart().entries().iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec![ProductId::new(2), ProductId::new(1)]);
}

#[tokio::test]
async fn test_corrupt_snapshot_loads_empty() {
    let ctx = TestContext::new().await;
    FileStorage::new(ctx.storage_path())
        .set_item(DEFAULT_CART_KEY, "[{\"id\": 1, \"amount\": \"lots\"}]")
        .unwrap();

    let store = ctx.store();

    assert!(store.cart().is_empty());
}

#[tokio::test]
async fn test_other_keys_are_preserved() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.stock_mock(1, 5).create_async().await;
    let _product = ctx.product_mock(1, "Tênis VR Caminhada", 139.9).create_async().await;

    let storage = FileStorage::new(ctx.storage_path());
    storage.set_item("@RocketShoes:theme", "dark").unwrap();

    ctx.store().add_product(ProductId::new(1)).await.unwrap();

    assert_eq!(
        storage.get_item("@RocketShoes:theme").unwrap().as_deref(),
        Some("dark")
    );
    assert!(storage.get_item(DEFAULT_CART_KEY).unwrap().is_some());
}
