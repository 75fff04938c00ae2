use storefront_types::Cart;

use crate::config::StorefrontConfig;
use crate::dom::ElementLookup;
use crate::error::Result;
use crate::storage::Storage;

/// The storefront controller.
///
/// Owns the in-memory cart and the injected storage/document capabilities.
/// Theme, cart and page operations are split across `theme.rs`, `cart.rs`
/// and `page.rs`.
pub struct Storefront<S, D> {
    pub(crate) storage: S,
    pub(crate) document: D,
    pub(crate) config: StorefrontConfig,
    pub(crate) cart: Cart,
}

impl<S: Storage, D: ElementLookup> Storefront<S, D> {
    /// Build a controller and load the persisted cart. A missing, unreadable
    /// or corrupt cart starts out empty.
    pub fn new(storage: S, document: D, config: StorefrontConfig) -> Self {
        let cart = match load_cart(&storage, &config.cart_key) {
            Ok(cart) => cart,
            Err(e) => {
                log::error!("Error loading cart, starting empty: {}", e);
                Cart::new()
            }
        };

        Self {
            storage,
            document,
            config,
            cart,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }
}

pub fn load_cart<S: Storage>(storage: &S, key: &str) -> Result<Cart> {
    match storage.get_item(key)? {
        Some(json) => Ok(Cart::from_json(&json)?),
        None => Ok(Cart::new()),
    }
}
