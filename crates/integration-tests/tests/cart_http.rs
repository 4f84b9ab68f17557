//! Full cart flows against a mock stock/catalog API.

#![allow(clippy::unwrap_used)]

use rocketshoes_cart::error::OUT_OF_STOCK_MESSAGE;
use rocketshoes_cart::notify::Notification;
use rocketshoes_cart::{CartError, UpdateProductAmount};
use rocketshoes_core::ProductId;
use rocketshoes_integration_tests::TestContext;

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn test_add_fetches_product_once_and_stops_at_stock() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.stock_mock(1, 5).create_async().await;
    let product = ctx
        .product_mock(1, "Tênis de Caminhada Leve Confortável", 179.9)
        .expect(1)
        .create_async()
        .await;
    let store = ctx.store();

    for expected in 1..=5 {
        store.add_product(ProductId::new(1)).await.unwrap();
        let cart = store.cart();
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount.get(), expected);
    }

    let err = store.add_product(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(err, CartError::OutOfStock { requested: 6, .. }));
    assert_eq!(store.cart().get(ProductId::new(1)).unwrap().amount.get(), 5);

    let notes = ctx.inbox.take();
    assert_eq!(notes.len(), 6);
    assert_eq!(notes[5], Notification::error(OUT_OF_STOCK_MESSAGE));
    product.assert_async().await;
}

#[tokio::test]
async fn test_add_persists_flat_entry_json() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.stock_mock(2, 3).create_async().await;
    let _product = ctx.product_mock(2, "Tênis VR Caminhada", 139.9).create_async().await;
    let store = ctx.store();

    store.add_product(ProductId::new(2)).await.unwrap();

    let persisted = ctx.persisted().unwrap();
    assert_eq!(
        persisted,
        serde_json::json!([{
            "id": 2,
            "title": "Tênis VR Caminhada",
            "price": 139.9,
            "image": "https://cdn.rocketshoes.test/2.jpg",
            "amount": 1,
        }])
    );
}

#[tokio::test]
async fn test_add_when_stock_endpoint_fails() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx
        .server
        .mock("GET", "/stock/1")
        .with_status(500)
        .create_async()
        .await;
    let store = ctx.store();

    let err = store.add_product(ProductId::new(1)).await.unwrap_err();

    assert!(err.is_transient());
    assert!(store.cart().is_empty());
    assert!(ctx.persisted().is_none());
    assert_eq!(
        ctx.inbox.take(),
        vec![Notification::error("Error adding product")]
    );
}

#[tokio::test]
async fn test_add_unknown_product() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.stock_mock(7, 10).create_async().await;
    let _product = ctx
        .server
        .mock("GET", "/products/7")
        .with_status(404)
        .create_async()
        .await;
    let store = ctx.store();

    let err = store.add_product(ProductId::new(7)).await.unwrap_err();

    assert!(err.is_transient());
    assert!(store.cart().is_empty());
}

// =============================================================================
// Update / Remove
// =============================================================================

#[tokio::test]
async fn test_update_checks_live_stock() {
    let mut ctx = TestContext::new().await;
    let stock = ctx.stock_mock(1, 5).create_async().await;
    let _product = ctx.product_mock(1, "Tênis Adidas Duramo Lite", 219.9).create_async().await;
    let store = ctx.store();
    store.add_product(ProductId::new(1)).await.unwrap();
    ctx.inbox.take();

    store
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(1),
            amount: 4,
        })
        .await
        .unwrap();
    assert_eq!(store.cart().get(ProductId::new(1)).unwrap().amount.get(), 4);
    assert!(ctx.inbox.take().is_empty());

    // Stock drops behind our back.
    stock.remove_async().await;
    let _stock = ctx.stock_mock(1, 2).create_async().await;

    let err = store
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(1),
            amount: 3,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CartError::OutOfStock { available: 2, .. }));
    assert_eq!(store.cart().get(ProductId::new(1)).unwrap().amount.get(), 4);
    assert_eq!(ctx.persisted().unwrap()[0]["amount"], 4);
}

#[tokio::test]
async fn test_update_invalid_amount_makes_no_request() {
    let mut ctx = TestContext::new().await;
    let stock = ctx.stock_mock(1, 5).expect(1).create_async().await;
    let _product = ctx.product_mock(1, "Tênis Adidas Duramo Lite", 219.9).create_async().await;
    let store = ctx.store();
    store.add_product(ProductId::new(1)).await.unwrap();

    let err = store
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(1),
            amount: 0,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CartError::InvalidAmount(_)));
    // Only the add hit the stock endpoint.
    stock.assert_async().await;
}

#[tokio::test]
async fn test_remove_needs_no_network() {
    let mut ctx = TestContext::new().await;
    let _stock = ctx.stock_mock(1, 5).create_async().await;
    let _product = ctx.product_mock(1, "Tênis Adidas Duramo Lite", 219.9).create_async().await;
    let store = ctx.store();
    store.add_product(ProductId::new(1)).await.unwrap();
    ctx.inbox.take();

    store.remove_product(ProductId::new(1)).await.unwrap();

    assert!(store.cart().is_empty());
    assert_eq!(ctx.persisted().unwrap(), serde_json::json!([]));
    assert_eq!(
        ctx.inbox.take(),
        vec![Notification::success("Product removed from cart")]
    );

    let err = store.remove_product(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(err, CartError::NotFound(_)));
}
