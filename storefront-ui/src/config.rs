use serde::Deserialize;
use storefront_types::{CART_KEY, THEME_KEY};

use crate::error::Result;

/// Id of the optional `<script type="application/json">` block holding
/// overrides for [`StorefrontConfig`].
pub const CONFIG_SCRIPT_ID: &str = "storefront-config";

/// Storage keys, element hooks and log level.
///
/// Defaults match the markup the storefront templates render. Any subset of
/// fields can be overridden from JSON; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    pub theme_key: String,
    pub cart_key: String,
    /// Attribute on the document root that carries the active theme
    pub theme_attribute: String,
    pub theme_icon_id: String,
    pub dark_icon_class: String,
    pub light_icon_class: String,
    pub cart_badge_selector: String,
    pub cart_items_id: String,
    pub cart_empty_id: String,
    pub cart_item_class: String,
    pub product_image_id: String,
    pub add_to_cart_selector: String,
    pub clear_cart_id: String,
    /// Same-page links that get smooth scrolling
    pub anchor_selector: String,
    pub cart_icon_selector: String,
    pub cart_modal_id: String,
    pub modal_backdrop_selector: String,
    pub modal_open_class: String,
    /// Let ESC close the cart modal
    pub modal_keyboard: bool,
    pub log_level: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            theme_key: THEME_KEY.to_string(),
            cart_key: CART_KEY.to_string(),
            theme_attribute: "data-theme".to_string(),
            theme_icon_id: "theme-icon".to_string(),
            dark_icon_class: "fas fa-star".to_string(),
            light_icon_class: "fas fa-moon".to_string(),
            cart_badge_selector: ".cart-badge".to_string(),
            cart_items_id: "cartItems".to_string(),
            cart_empty_id: "cartEmpty".to_string(),
            cart_item_class: "cart-item".to_string(),
            product_image_id: "productImage".to_string(),
            add_to_cart_selector: ".add-to-cart".to_string(),
            clear_cart_id: "clearCart".to_string(),
            anchor_selector: "a[href^=\"#\"]".to_string(),
            cart_icon_selector: ".cart-icon".to_string(),
            cart_modal_id: "cartModal".to_string(),
            modal_backdrop_selector: ".modal-backdrop".to_string(),
            modal_open_class: "modal-open".to_string(),
            modal_keyboard: true,
            log_level: "info".to_string(),
        }
    }
}

impl StorefrontConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parsed log level, `Info` when the configured value is not a level name.
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
