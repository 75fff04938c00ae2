use storefront_types::CartItem;

use crate::controller::Storefront;
use crate::dom::{ElementHandle, ElementLookup};
use crate::error::Result;
use crate::storage::Storage;

impl<S: Storage, D: ElementLookup> Storefront<S, D> {
    /// Append `item`, persist and re-render. Field validation is the
    /// caller's job.
    ///
    /// When persisting fails the item stays in memory, the error is logged
    /// and the badge/modal are not refreshed.
    pub fn add_to_cart(&mut self, item: CartItem) {
        self.cart.push(item);
        if let Err(e) = self.persist_cart() {
            log::error!("Error adding to cart: {}", e);
            return;
        }
        self.update_cart_badge();
        self.update_cart_modal();
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        if let Err(e) = self.persist_cart() {
            log::error!("Error clearing cart: {}", e);
            return;
        }
        self.update_cart_badge();
        self.update_cart_modal();
    }

    fn persist_cart(&self) -> Result<()> {
        let json = self.cart.to_json()?;
        self.storage.set_item(&self.config.cart_key, &json)
    }

    pub fn update_cart_badge(&self) {
        if let Err(e) = self.try_update_cart_badge() {
            log::error!("Error updating cart badge: {}", e);
        }
    }

    fn try_update_cart_badge(&self) -> Result<()> {
        let Some(badge) = self
            .document
            .query_selector(&self.config.cart_badge_selector)?
        else {
            log::warn!("Cart badge not found");
            return Ok(());
        };

        let count = self.cart.len();
        badge.set_text(&count.to_string());
        badge.set_style("display", if count > 0 { "block" } else { "none" })
    }

    /// Rebuild the modal list from scratch.
    pub fn update_cart_modal(&self) {
        if let Err(e) = self.try_update_cart_modal() {
            log::error!("Error updating cart modal: {}", e);
        }
    }

    fn try_update_cart_modal(&self) -> Result<()> {
        let items = self.document.element_by_id(&self.config.cart_items_id);
        let empty = self.document.element_by_id(&self.config.cart_empty_id);
        let (Some(items), Some(empty)) = (items, empty) else {
            log::warn!("Cart items or empty message element not found");
            return Ok(());
        };

        items.clear_children();
        if self.cart.is_empty() {
            return empty.set_style("display", "block");
        }

        empty.set_style("display", "none")?;
        for item in &self.cart {
            items.append_text_block(&self.config.cart_item_class, &item.label())?;
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

    struct Fixture {
        storage: MemoryStorage,
        badge: MemoryElement,
        items: MemoryElement,
        empty: MemoryElement,
        storefront: Storefront<MemoryStorage, MemoryDocument>,
    }

    fn fixture(storage: MemoryStorage) -> Fixture {
        let doc = MemoryDocument::new();
        let badge = doc.create("span").with_class("cart-badge");
        let items = doc.create("div").with_id("cartItems");
        let empty = doc.create("p").with_id("cartEmpty");
        let storefront = Storefront::new(storage.clone(), doc, StorefrontConfig::default());
        Fixture {
            storage,
            badge,
            items,
            empty,
            storefront,
        }
    }

    fn rendered(items: &MemoryElement) -> Vec<String> {
        items
            .children()
            .iter()
            .map(MemoryElement::text_content)
            .collect()
    }

    #[test]
    fn add_updates_badge_modal_and_storage() {
        let mut f = fixture(MemoryStorage::new());
        f.storefront.add_to_cart(CartItem::new("1", "A", "9.99"));

        assert_eq!(f.storefront.cart().len(), 1);
        assert_eq!(f.badge.text(), "1");
        assert_eq!(f.badge.style("display").as_deref(), Some("block"));
        assert_eq!(f.empty.style("display").as_deref(), Some("none"));
        assert_eq!(rendered(&f.items), vec!["A - $9.99"]);
        assert_eq!(
            f.storage.item("cart").as_deref(),
            Some(r#"[{"id":"1","name":"A","price":"9.99"}]"#)
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let mut f = fixture(MemoryStorage::new());
        f.storefront.add_to_cart(CartItem::new("1", "A", "9.99"));
        f.storefront.add_to_cart(CartItem::new("1", "A", "9.99"));
        assert_eq!(f.badge.text(), "2");
        assert_eq!(rendered(&f.items), vec!["A - $9.99", "A - $9.99"]);
    }

    #[test]
    fn clear_shows_empty_placeholder() {
        let storage =
            MemoryStorage::new().with_item("cart", r#"[{"id":"1","name":"A","price":"9.99"}]"#);
        let mut f = fixture(storage);
        f.storefront.update_cart_modal();
        assert_eq!(rendered(&f.items).len(), 1);

        f.storefront.clear_cart();
        assert!(f.storefront.cart().is_empty());
        assert_eq!(f.badge.text(), "0");
        assert_eq!(f.badge.style("display").as_deref(), Some("none"));
        assert_eq!(f.empty.style("display").as_deref(), Some("block"));
        assert!(f.items.children().is_empty());
        assert_eq!(f.storage.item("cart").as_deref(), Some("[]"));
    }

    #[test]
    fn failed_persist_keeps_memory_but_skips_render() {
        let mut f = fixture(MemoryStorage::new());
        f.storefront.update_cart_badge();
        f.storage.fail_writes(true);

        f.storefront.add_to_cart(CartItem::new("1", "A", "9.99"));
        assert_eq!(f.storefront.cart().len(), 1);
        assert_eq!(f.badge.text(), "0");
        assert_eq!(f.storage.item("cart"), None);
    }

    #[test]
    fn failed_clear_keeps_storage_and_skips_render() {
        let mut f = fixture(MemoryStorage::new());
        f.storefront.add_to_cart(CartItem::new("1", "A", "9.99"));
        let stored = f.storage.item("cart");
        f.storage.fail_writes(true);

        f.storefront.clear_cart();
        assert!(f.storefront.cart().is_empty());
        assert_eq!(f.badge.text(), "1");
        assert_eq!(rendered(&f.items), vec!["A - $9.99"]);
        assert_eq!(f.storage.item("cart"), stored);
        assert!(stored.is_some());
    }

    #[test]
    fn item_labels_are_text_not_markup() {
        let mut f = fixture(MemoryStorage::new());
        f.storefront
            .add_to_cart(CartItem::new("x", "<b>Bold</b>", "1"));
        let block = &f.items.children()[0];
        assert_eq!(block.children().len(), 1);
        assert_eq!(block.text_content(), "<b>Bold</b> - $1");
    }

    #[test]
    fn missing_elements_do_not_block_mutation() {
        let storage = MemoryStorage::new();
        let mut storefront =
            Storefront::new(storage.clone(), MemoryDocument::new(), StorefrontConfig::default());
        storefront.add_to_cart(CartItem::new("1", "A", "9.99"));
        assert_eq!(storefront.cart().len(), 1);
        assert!(storage.item("cart").is_some());
    }
}
