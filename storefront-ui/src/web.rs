//! `web_sys` implementations of the storage and document capabilities.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, ScrollBehavior, ScrollIntoViewOptions};

use crate::config::{StorefrontConfig, CONFIG_SCRIPT_ID};
use crate::dom::{ElementHandle, ElementLookup};
use crate::error::{Result, StorefrontError};
use crate::storage::Storage;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap, js_name = Modal)]
    type BootstrapModal;

    #[wasm_bindgen(constructor, js_namespace = bootstrap, js_class = "Modal", catch)]
    fn new(
        element: &web_sys::Element,
        options: &JsValue,
    ) -> std::result::Result<BootstrapModal, JsValue>;

    #[wasm_bindgen(method, js_class = "Modal", catch)]
    fn show(this: &BootstrapModal) -> std::result::Result<(), JsValue>;
}

pub(crate) fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

fn dom_error(value: JsValue) -> StorefrontError {
    StorefrontError::Dom(js_error(value))
}

// ============================================================================
// Storage
// ============================================================================

/// `window.localStorage`. When the browser refuses access every operation
/// fails with [`StorefrontError::Storage`] instead.
pub struct BrowserStorage {
    storage: Option<web_sys::Storage>,
}

impl BrowserStorage {
    pub fn local() -> Self {
        let storage = match web_sys::window().map(|window| window.local_storage()) {
            Some(Ok(Some(storage))) => Some(storage),
            Some(Ok(None)) | None => {
                log::error!("Local storage is not available");
                None
            }
            Some(Err(e)) => {
                log::error!("Local storage access denied: {}", js_error(e));
                None
            }
        };
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorefrontError::Storage("local storage unavailable".to_string()))
    }
}

impl Storage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorefrontError::Storage(js_error(e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorefrontError::Storage(js_error(e)))
    }
}

// ============================================================================
// Document
// ============================================================================

impl ElementHandle for web_sys::Element {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        web_sys::Element::set_attribute(self, name, value).map_err(dom_error)
    }

    fn set_class_name(&self, class_name: &str) {
        web_sys::Element::set_class_name(self, class_name);
    }

    fn set_class(&self, class: &str, present: bool) -> Result<()> {
        self.class_list()
            .toggle_with_force(class, present)
            .map(|_| ())
            .map_err(dom_error)
    }

    fn set_style(&self, property: &str, value: &str) -> Result<()> {
        let element = self.dyn_ref::<HtmlElement>().ok_or_else(|| {
            StorefrontError::Dom(format!("<{}> has no inline style", self.tag_name()))
        })?;
        element
            .style()
            .set_property(property, value)
            .map_err(dom_error)
    }

    fn set_text(&self, text: &str) {
        self.set_text_content(Some(text));
    }

    fn clear_children(&self) {
        self.set_inner_html("");
    }

    fn append_text_block(&self, class_name: &str, text: &str) -> Result<()> {
        let document = self
            .owner_document()
            .ok_or_else(|| StorefrontError::Dom("element is not in a document".to_string()))?;

        let block = document.create_element("div").map_err(dom_error)?;
        block.set_class_name(class_name);
        let paragraph = document.create_element("p").map_err(dom_error)?;
        paragraph.set_text_content(Some(text));

        block.append_child(&paragraph).map_err(dom_error)?;
        self.append_child(&block).map_err(dom_error)?;
        Ok(())
    }

    fn scroll_into_view_smooth(&self) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        self.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn remove(&self) {
        web_sys::Element::remove(self);
    }
}

pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// The document of the global `window`.
    pub fn current() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
    }

    pub fn inner(&self) -> &web_sys::Document {
        &self.document
    }
}

impl ElementLookup for WebDocument {
    type Element = web_sys::Element;

    fn root(&self) -> Option<web_sys::Element> {
        self.document.document_element()
    }

    fn body(&self) -> Option<web_sys::Element> {
        self.document.body().map(web_sys::Element::from)
    }

    fn element_by_id(&self, id: &str) -> Option<web_sys::Element> {
        self.document.get_element_by_id(id)
    }

    fn query_selector(&self, selector: &str) -> Result<Option<web_sys::Element>> {
        self.document.query_selector(selector).map_err(dom_error)
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<web_sys::Element>> {
        let nodes = self.document.query_selector_all(selector).map_err(dom_error)?;
        Ok((0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .collect())
    }

    fn show_modal(&self, modal: &web_sys::Element, keyboard: bool) -> Result<()> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(
            &options,
            &JsValue::from_str("keyboard"),
            &JsValue::from_bool(keyboard),
        )
        .map_err(dom_error)?;
        BootstrapModal::new(modal, &options)
            .and_then(|dialog| dialog.show())
            .map_err(dom_error)
    }
}

// ============================================================================
// Config
// ============================================================================

/// Read overrides from `<script type="application/json" id="storefront-config">`.
/// Defaults when the block is absent or empty.
pub fn read_page_config(document: &web_sys::Document) -> Result<StorefrontConfig> {
    let json = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|script| script.text_content())
        .filter(|text| !text.trim().is_empty());

    match json {
        Some(json) => StorefrontConfig::from_json(&json),
        None => Ok(StorefrontConfig::default()),
    }
}
