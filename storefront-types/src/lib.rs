//! Storefront state that outlives a page load
//!
//! Everything in here is persisted to the browser's local key-value storage
//! as plain strings:
//! - `theme` holds a [`Theme`] as `"light"` / `"dark"`
//! - `cart` holds a [`Cart`] as a JSON array of `{id, name, price}` objects

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage key for the theme preference
pub const THEME_KEY: &str = "theme";

/// Storage key for the serialized cart
pub const CART_KEY: &str = "cart";

// ============================================================================
// Theme
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Strict parse. Anything other than `"light"` or `"dark"` is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Resolve a raw stored value. Missing and unrecognized values both
    /// fall back to the default theme.
    pub fn from_stored(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Cart
// ============================================================================

/// A product as read off an "add to cart" button.
///
/// All fields are free-form; `price` is displayed verbatim and never parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: String,
}

impl CartItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
        }
    }

    /// Line shown in the cart modal, e.g. `"Phone - $999"`.
    pub fn label(&self) -> String {
        format!("{} - ${}", self.name, self.price)
    }
}

/// Ordered cart contents. Insertion order is display order and duplicate
/// entries are kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: CartItem) {
        self.items.push(item);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a stored cart. A stored `null` is treated as an empty cart.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let items: Option<Vec<CartItem>> = serde_json::from_str(json)?;
        Ok(Self {
            items: items.unwrap_or_default(),
        })
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
