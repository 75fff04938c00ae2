//! Document access capabilities.
//!
//! The controller only touches the page through these traits. The browser
//! implementation lives in [`crate::web`]; `memory::MemoryDocument` is a
//! small in-memory document for tests, built with the `test-support` feature.

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

use crate::error::Result;

/// A handle to one element. Handles are cheap to clone and compare by
/// identity, not by content.
pub trait ElementHandle: Clone {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str) -> Result<()>;

    /// Replace the whole class list.
    fn set_class_name(&self, class_name: &str);

    /// Add `class` when `present` is true, remove it otherwise.
    fn set_class(&self, class: &str, present: bool) -> Result<()>;

    fn set_style(&self, property: &str, value: &str) -> Result<()>;
    fn set_text(&self, text: &str);
    fn clear_children(&self);

    /// Append `<div class="{class_name}"><p>{text}</p></div>`. `text` is
    /// inserted as a text node.
    fn append_text_block(&self, class_name: &str, text: &str) -> Result<()>;

    fn scroll_into_view_smooth(&self);

    /// Detach the element from the document.
    fn remove(&self);
}

/// Document-level lookup plus the modal library hook.
pub trait ElementLookup {
    type Element: ElementHandle;

    /// The `<html>` element.
    fn root(&self) -> Option<Self::Element>;
    fn body(&self) -> Option<Self::Element>;
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Fails only when `selector` is not a valid selector.
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Element>>;
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self::Element>>;

    fn show_modal(&self, modal: &Self::Element, keyboard: bool) -> Result<()>;
}
