//! Page start-up and the event handlers it wires.
//!
//! [`Storefront::initialize`] decides what gets bound; a [`PageBinder`]
//! does the binding. The browser binder in [`crate::interop`] attaches real
//! listeners, [`PageBindings`] just records what it was handed.

use storefront_types::CartItem;

use crate::controller::Storefront;
use crate::dom::{ElementHandle, ElementLookup};
use crate::error::{Result, StorefrontError};
use crate::storage::Storage;
use crate::zoom::ProductZoom;

pub const PRODUCT_ID_ATTR: &str = "data-product-id";
pub const PRODUCT_NAME_ATTR: &str = "data-product-name";
pub const PRODUCT_PRICE_ATTR: &str = "data-product-price";

pub trait PageBinder<E> {
    fn bind_product_zoom(&mut self, zoom: ProductZoom<E>);
    fn bind_add_to_cart(&mut self, button: E);
    fn bind_clear_cart(&mut self, button: E);
    /// `href` has already been checked with [`scroll_target`].
    fn bind_scroll_anchor(&mut self, anchor: E, href: String);
    fn bind_cart_icon(&mut self, icon: E);
    fn bind_modal_hidden(&mut self, modal: E);
}

/// Everything [`Storefront::initialize`] asked to bind, in order.
#[derive(Debug)]
pub struct PageBindings<E> {
    pub product_zoom: Option<ProductZoom<E>>,
    pub add_to_cart_buttons: Vec<E>,
    pub clear_cart_button: Option<E>,
    pub scroll_anchors: Vec<(E, String)>,
    pub cart_icon: Option<E>,
    pub cart_modal: Option<E>,
}

impl<E> Default for PageBindings<E> {
    fn default() -> Self {
        Self {
            product_zoom: None,
            add_to_cart_buttons: Vec::new(),
            clear_cart_button: None,
            scroll_anchors: Vec::new(),
            cart_icon: None,
            cart_modal: None,
        }
    }
}

impl<E> PageBinder<E> for PageBindings<E> {
    fn bind_product_zoom(&mut self, zoom: ProductZoom<E>) {
        self.product_zoom = Some(zoom);
    }

    fn bind_add_to_cart(&mut self, button: E) {
        self.add_to_cart_buttons.push(button);
    }

    fn bind_clear_cart(&mut self, button: E) {
        self.clear_cart_button = Some(button);
    }

    fn bind_scroll_anchor(&mut self, anchor: E, href: String) {
        self.scroll_anchors.push((anchor, href));
    }

    fn bind_cart_icon(&mut self, icon: E) {
        self.cart_icon = Some(icon);
    }

    fn bind_modal_hidden(&mut self, modal: E) {
        self.cart_modal = Some(modal);
    }
}

/// The in-page target of an anchor, or `None` for links that should keep
/// their default behaviour (`""` and a bare `"#"`).
pub fn scroll_target(href: Option<&str>) -> Option<&str> {
    href.filter(|href| !href.is_empty() && *href != "#")
}

/// Read a product off an "add to cart" button. Every field must be present
/// and non-empty.
pub fn product_from_button<E: ElementHandle>(button: &E) -> Result<CartItem> {
    let field = |name: &str| button.attribute(name).filter(|value| !value.is_empty());

    match (
        field(PRODUCT_ID_ATTR),
        field(PRODUCT_NAME_ATTR),
        field(PRODUCT_PRICE_ATTR),
    ) {
        (Some(id), Some(name), Some(price)) => Ok(CartItem { id, name, price }),
        (id, name, price) => Err(StorefrontError::InvalidProduct { id, name, price }),
    }
}

impl<S: Storage, D: ElementLookup> Storefront<S, D> {
    /// Run the page start-up sequence, handing each element that needs a
    /// listener to `binder`.
    ///
    /// Missing optional elements only produce warnings. An error stops the
    /// sequence where it happened; whatever was bound before stays bound.
    pub fn initialize<B>(&mut self, binder: &mut B) -> Result<()>
    where
        B: PageBinder<D::Element>,
    {
        self.apply_saved_theme();
        self.update_cart_badge();
        self.update_cart_modal();

        match self.document.element_by_id(&self.config.product_image_id) {
            Some(image) => binder.bind_product_zoom(ProductZoom::new(image)),
            None => log::warn!("Product image not found for zoom"),
        }

        for button in self
            .document
            .query_selector_all(&self.config.add_to_cart_selector)?
        {
            binder.bind_add_to_cart(button);
        }

        match self.document.element_by_id(&self.config.clear_cart_id) {
            Some(button) => binder.bind_clear_cart(button),
            None => log::warn!("Clear cart button not found"),
        }

        for anchor in self.document.query_selector_all(&self.config.anchor_selector)? {
            let href = anchor.attribute("href");
            if let Some(target) = scroll_target(href.as_deref()) {
                binder.bind_scroll_anchor(anchor, target.to_string());
            }
        }

        match self.document.query_selector(&self.config.cart_icon_selector)? {
            Some(icon) => binder.bind_cart_icon(icon),
            None => log::warn!("Cart icon not found"),
        }

        match self.document.element_by_id(&self.config.cart_modal_id) {
            Some(modal) => binder.bind_modal_hidden(modal),
            None => log::warn!("Cart modal not found"),
        }

        log::debug!("Storefront initialized with {} cart item(s)", self.cart.len());
        Ok(())
    }

    /// Click on an "add to cart" button. Fields are read at click time so
    /// later attribute changes are honored.
    pub fn handle_add_to_cart_click(&mut self, button: &D::Element) {
        match product_from_button(button) {
            Ok(item) => self.add_to_cart(item),
            Err(e) => log::error!("{}", e),
        }
    }

    /// Click on a same-page link. The caller has already suppressed the
    /// default navigation.
    pub fn handle_anchor_click(&self, href: &str) {
        match self.document.query_selector(href) {
            Ok(Some(target)) => target.scroll_into_view_smooth(),
            Ok(None) => log::debug!("No element matches anchor {}", href),
            Err(e) => log::error!("Error resolving anchor {}: {}", href, e),
        }
    }

    pub fn handle_cart_icon_click(&self) {
        log::info!("Cart icon clicked");
        if let Err(e) = self.open_cart_modal() {
            log::error!("Error opening cart modal: {}", e);
        }
    }

    fn open_cart_modal(&self) -> Result<()> {
        let modal = self
            .document
            .element_by_id(&self.config.cart_modal_id)
            .ok_or_else(|| StorefrontError::MissingElement(self.config.cart_modal_id.clone()))?;
        self.document.show_modal(&modal, self.config.modal_keyboard)
    }

    /// The modal library can leave the page scroll-locked after closing;
    /// undo its body class, overflow and backdrops.
    pub fn handle_cart_modal_hidden(&self) {
        log::info!("Cart modal closed");
        if let Err(e) = self.release_scroll_lock() {
            log::error!("Error cleaning up after cart modal: {}", e);
        }
    }

    fn release_scroll_lock(&self) -> Result<()> {
        if let Some(body) = self.document.body() {
            body.set_class(&self.config.modal_open_class, false)?;
            body.set_style("overflow", "auto")?;
        }
        for backdrop in self
            .document
            .query_selector_all(&self.config.modal_backdrop_selector)?
        {
            backdrop.remove();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorefrontConfig;
    use crate::dom::memory::{MemoryDocument, MemoryElement};
    use crate::storage::MemoryStorage;

    fn storefront(doc: &MemoryDocument) -> Storefront<MemoryStorage, MemoryDocument> {
        Storefront::new(MemoryStorage::new(), doc.clone(), StorefrontConfig::default())
    }

    fn button(doc: &MemoryDocument, id: &str, name: &str, price: &str) -> MemoryElement {
        doc.create("button")
            .with_class("add-to-cart")
            .with_attr(PRODUCT_ID_ATTR, id)
            .with_attr(PRODUCT_NAME_ATTR, name)
            .with_attr(PRODUCT_PRICE_ATTR, price)
    }

    #[test]
    fn scroll_target_skips_empty_and_bare_hash() {
        assert_eq!(scroll_target(None), None);
        assert_eq!(scroll_target(Some("")), None);
        assert_eq!(scroll_target(Some("#")), None);
        assert_eq!(scroll_target(Some("#specs")), Some("#specs"));
    }

    #[test]
    fn product_from_button_requires_every_field() {
        let doc = MemoryDocument::new();
        let ok = button(&doc, "1", "A", "9.99");
        assert_eq!(
            product_from_button(&ok).unwrap(),
            CartItem::new("1", "A", "9.99")
        );

        let empty_name = button(&doc, "1", "", "9.99");
        let err = product_from_button(&empty_name).expect_err("must fail");
        assert!(matches!(
            err,
            StorefrontError::InvalidProduct { name: None, .. }
        ));

        let no_price = doc
            .create("button")
            .with_attr(PRODUCT_ID_ATTR, "1")
            .with_attr(PRODUCT_NAME_ATTR, "A");
        assert!(product_from_button(&no_price).is_err());
    }

    #[test]
    fn initialize_binds_what_is_present() {
        let doc = MemoryDocument::new();
        let image = doc.create("img").with_id("productImage");
        let first = button(&doc, "1", "A", "9.99");
        let second = button(&doc, "2", "B", "5.00");
        let clear = doc.create("button").with_id("clearCart");
        let specs = doc.create("a").with_attr("href", "#specs");
        doc.create("a").with_attr("href", "#");
        doc.create("a").with_attr("href", "/phones");
        let icon = doc.create("a").with_class("cart-icon");
        let modal = doc.create("div").with_id("cartModal");

        let mut storefront = storefront(&doc);
        let mut bindings = PageBindings::default();
        storefront.initialize(&mut bindings).expect("should initialize");

        assert_eq!(bindings.product_zoom.map(|z| z.image().clone()), Some(image));
        assert_eq!(bindings.add_to_cart_buttons, vec![first, second]);
        assert_eq!(bindings.clear_cart_button, Some(clear));
        assert_eq!(bindings.scroll_anchors, vec![(specs, "#specs".to_string())]);
        assert_eq!(bindings.cart_icon, Some(icon));
        assert_eq!(bindings.cart_modal, Some(modal));
    }

    #[test]
    fn initialize_on_a_bare_page_applies_theme_only() {
        let doc = MemoryDocument::new();
        let mut storefront = storefront(&doc);
        let mut bindings = PageBindings::default();
        storefront.initialize(&mut bindings).expect("should initialize");

        assert_eq!(
            doc.root_element().attribute("data-theme").as_deref(),
            Some("light")
        );
        assert!(bindings.product_zoom.is_none());
        assert!(bindings.add_to_cart_buttons.is_empty());
        assert!(bindings.cart_modal.is_none());
    }

    #[test]
    fn invalid_selector_stops_initialization_midway() {
        let doc = MemoryDocument::new();
        let first = button(&doc, "1", "A", "9.99");
        let config = StorefrontConfig {
            anchor_selector: "a[href".to_string(),
            ..StorefrontConfig::default()
        };
        let mut storefront = Storefront::new(MemoryStorage::new(), doc.clone(), config);
        let mut bindings = PageBindings::default();

        assert!(storefront.initialize(&mut bindings).is_err());
        assert_eq!(bindings.add_to_cart_buttons, vec![first]);
        assert!(bindings.cart_icon.is_none());
    }

    #[test]
    fn add_to_cart_click_reads_attributes_at_click_time() {
        let doc = MemoryDocument::new();
        let phone = button(&doc, "iphone-15-pro", "iPhone 15 Pro", "999");
        let mut storefront = storefront(&doc);

        storefront.handle_add_to_cart_click(&phone);
        assert_eq!(storefront.cart().items()[0].name, "iPhone 15 Pro");

        let broken = phone.clone().with_attr(PRODUCT_PRICE_ATTR, "");
        storefront.handle_add_to_cart_click(&broken);
        assert_eq!(storefront.cart().len(), 1);
    }

    #[test]
    fn anchor_click_scrolls_existing_target() {
        let doc = MemoryDocument::new();
        let section = doc.create("section").with_id("specs");
        let storefront = storefront(&doc);

        storefront.handle_anchor_click("#specs");
        storefront.handle_anchor_click("#missing");
        storefront.handle_anchor_click("#");
        assert_eq!(section.scroll_count(), 1);
    }

    #[test]
    fn cart_icon_opens_modal_with_keyboard_dismissal() {
        let doc = MemoryDocument::new();
        let modal = doc.create("div").with_id("cartModal");
        let storefront = storefront(&doc);

        storefront.handle_cart_icon_click();
        let shown = doc.shown_modals();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].modal, modal);
        assert!(shown[0].keyboard);
    }

    #[test]
    fn cart_icon_without_modal_library_is_logged_not_raised() {
        let doc = MemoryDocument::new();
        doc.create("div").with_id("cartModal");
        doc.unload_modal_library();
        let storefront = storefront(&doc);

        storefront.handle_cart_icon_click();
        assert!(doc.shown_modals().is_empty());
    }

    #[test]
    fn modal_hidden_releases_scroll_lock() {
        let doc = MemoryDocument::new();
        let body = doc.body_element().with_class("modal-open");
        body.set_style("overflow", "hidden").unwrap();
        let first = doc.create("div").with_class("modal-backdrop");
        let second = doc.create("div").with_class("modal-backdrop").with_class("fade");
        let storefront = storefront(&doc);

        storefront.handle_cart_modal_hidden();
        assert!(!body.has_class("modal-open"));
        assert_eq!(body.style("overflow").as_deref(), Some("auto"));
        assert!(first.is_removed());
        assert!(second.is_removed());
    }
}
