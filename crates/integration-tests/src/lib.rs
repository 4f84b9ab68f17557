//! Integration tests for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_http` - Full cart flows against a mock stock/catalog API
//! - `cart_persistence` - Snapshot survival across store instances
//!
//! The helpers below spin up a `mockito` server standing in for the REST API
//! and a temporary directory for the storage file.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mockito::{Mock, ServerGuard};
use rocketshoes_cart::api::HttpApi;
use rocketshoes_cart::config::ApiConfig;
use rocketshoes_cart::notify::{Notification, Notifier};
use rocketshoes_cart::storage::{DEFAULT_CART_KEY, FileStorage};
use rocketshoes_cart::{CartStore, Collaborators};
use tempfile::TempDir;
use url::Url;

/// Collects notifications for assertions.
#[derive(Clone, Default)]
pub struct Inbox {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl Inbox {
    /// Drain everything received so far.
    #[must_use]
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.seen.lock().unwrap())
    }
}

impl Notifier for Inbox {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Mock API server, storage directory and a store wired to both.
pub struct TestContext {
    pub server: ServerGuard,
    pub dir: TempDir,
    pub inbox: Inbox,
}

impl TestContext {
    pub async fn new() -> Self {
        Self {
            server: mockito::Server::new_async().await,
            dir: tempfile::tempdir().unwrap(),
            inbox: Inbox::default(),
        }
    }

    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.dir.path().join("cart.json")
    }

    /// A fresh store over the same server and storage file.
    #[must_use]
    pub fn store(&self) -> CartStore {
        let config = ApiConfig {
            base_url: Url::parse(&self.server.url()).unwrap(),
            token: None,
            timeout: Some(Duration::from_secs(5)),
        };
        let api = HttpApi::new(&config).unwrap();
        CartStore::load(
            Collaborators::new(api, FileStorage::new(self.storage_path()), self.inbox.clone()),
            DEFAULT_CART_KEY,
        )
    }

    /// Raw persisted snapshot, parsed as JSON.
    #[must_use]
    pub fn persisted(&self) -> Option<serde_json::Value> {
        let contents = std::fs::read_to_string(self.storage_path()).ok()?;
        let items: serde_json::Value = serde_json::from_str(&contents).unwrap();
        let raw = items.get(DEFAULT_CART_KEY)?.as_str()?;
        Some(serde_json::from_str(raw).unwrap())
    }

    /// Mock for `GET /stock/{id}` with the given amount; call `create_async`.
    pub fn stock_mock(&mut self, id: i64, amount: u32) -> Mock {
        self.server
            .mock("GET", format!("/stock/{id}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"id": {id}, "amount": {amount}}}"#))
    }

    /// Mock for `GET /products/{id}`; call `create_async`.
    pub fn product_mock(&mut self, id: i64, title: &str, price: f64) -> Mock {
        self.server
            .mock("GET", format!("/products/{id}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "id": id,
                    "title": title,
                    "price": price,
                    "image": format!("https://cdn.rocketshoes.test/{id}.jpg"),
                })
                .to_string(),
            )
    }
}
