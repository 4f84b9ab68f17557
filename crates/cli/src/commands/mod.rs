//! Cart commands.

use std::fmt::Write as _;

use rocketshoes_cart::api::HttpApi;
use rocketshoes_cart::config::CartConfig;
use rocketshoes_cart::storage::FileStorage;
use rocketshoes_cart::{Cart, CartStore, Collaborators};
use rocketshoes_core::CurrencyCode;

/// Build a store backed by the HTTP API and the configured storage file.
///
/// # Errors
///
/// Returns error if the HTTP client cannot be built.
pub fn open_store(config: &CartConfig) -> Result<CartStore, rocketshoes_cart::api::ApiError> {
    let api = HttpApi::new(&config.api)?;
    let storage = FileStorage::new(&config.storage_path);
    tracing::debug!(path = %storage.path().display(), "Using cart storage file");

    Ok(CartStore::load(
        Collaborators::with_tracing(api, storage),
        config.storage_key.clone(),
    ))
}

/// Print the cart.
#[allow(clippy::print_stdout)]
pub fn show(store: &CartStore) {
    print!("{}", render(&store.cart(), CurrencyCode::BRL));
}

/// Render the cart as a plain-text table.
fn render(cart: &Cart, currency: CurrencyCode) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for entry in cart {
        let _ = writeln!(
            out,
            "{:>6}  {:<40} {:>4} x {:>12} = {:>12}",
            entry.id(),
            entry.product.title,
            entry.amount,
            entry.product.price.display(currency),
            entry.subtotal().display(currency),
        );
    }
    let _ = writeln!(
        out,
        "{} product(s), {} item(s), total {}",
        cart.len(),
        cart.item_count(),
        cart.total().display(currency),
    );
    out
}
