//! In-memory document used by tests.
//!
//! Supports the selector forms the controller issues: `tag`, `#id`,
//! `.class`, compounds of those, and a single trailing attribute test
//! (`[name]`, `[name="v"]`, `[name^="v"]`). Anything else is rejected as an
//! invalid selector, the same way a browser rejects malformed ones.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::dom::{ElementHandle, ElementLookup};
use crate::error::{Result, StorefrontError};

#[derive(Debug, Default)]
struct ElementData {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    children: Vec<MemoryElement>,
    removed: bool,
    scroll_count: usize,
}

#[derive(Debug, Clone)]
pub struct MemoryElement {
    data: Rc<RefCell<ElementData>>,
}

impl PartialEq for MemoryElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl MemoryElement {
    fn new(tag: &str) -> Self {
        Self {
            data: Rc::new(RefCell::new(ElementData {
                tag: tag.to_ascii_lowercase(),
                ..ElementData::default()
            })),
        }
    }

    pub fn with_id(self, id: &str) -> Self {
        self.data
            .borrow_mut()
            .attributes
            .insert("id".to_string(), id.to_string());
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        {
            let mut data = self.data.borrow_mut();
            if !data.classes.iter().any(|c| c == class) {
                data.classes.push(class.to_string());
            }
        }
        self
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.data
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn tag(&self) -> String {
        self.data.borrow().tag.clone()
    }

    pub fn id(&self) -> Option<String> {
        self.data.borrow().attributes.get("id").cloned()
    }

    pub fn class_name(&self) -> String {
        self.data.borrow().classes.join(" ")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.data.borrow().classes.iter().any(|c| c == class)
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.data.borrow().style.get(property).cloned()
    }

    /// Text set directly on this element.
    pub fn text(&self) -> String {
        self.data.borrow().text.clone()
    }

    /// Text of this element followed by the text of its descendants.
    pub fn text_content(&self) -> String {
        let data = self.data.borrow();
        let mut text = data.text.clone();
        for child in &data.children {
            text.push_str(&child.text_content());
        }
        text
    }

    pub fn children(&self) -> Vec<MemoryElement> {
        self.data.borrow().children.clone()
    }

    pub fn is_removed(&self) -> bool {
        self.data.borrow().removed
    }

    pub fn scroll_count(&self) -> usize {
        self.data.borrow().scroll_count
    }
}

impl ElementHandle for MemoryElement {
    fn attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            let class_name = self.class_name();
            return (!class_name.is_empty()).then_some(class_name);
        }
        self.data.borrow().attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        if name == "class" {
            self.set_class_name(value);
        } else {
            self.data
                .borrow_mut()
                .attributes
                .insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    fn set_class_name(&self, class_name: &str) {
        self.data.borrow_mut().classes = class_name
            .split_whitespace()
            .map(str::to_string)
            .collect();
    }

    fn set_class(&self, class: &str, present: bool) -> Result<()> {
        let mut data = self.data.borrow_mut();
        let has = data.classes.iter().any(|c| c == class);
        if present && !has {
            data.classes.push(class.to_string());
        } else if !present {
            data.classes.retain(|c| c != class);
        }
        Ok(())
    }

    fn set_style(&self, property: &str, value: &str) -> Result<()> {
        self.data
            .borrow_mut()
            .style
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn set_text(&self, text: &str) {
        let mut data = self.data.borrow_mut();
        data.text = text.to_string();
        data.children.clear();
    }

    fn clear_children(&self) {
        let mut data = self.data.borrow_mut();
        data.text.clear();
        data.children.clear();
    }

    fn append_text_block(&self, class_name: &str, text: &str) -> Result<()> {
        let paragraph = MemoryElement::new("p");
        paragraph.set_text(text);

        let block = MemoryElement::new("div");
        block.set_class_name(class_name);
        block.data.borrow_mut().children.push(paragraph);

        self.data.borrow_mut().children.push(block);
        Ok(())
    }

    fn scroll_into_view_smooth(&self) {
        self.data.borrow_mut().scroll_count += 1;
    }

    fn remove(&self) {
        self.data.borrow_mut().removed = true;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShownModal {
    pub modal: MemoryElement,
    pub keyboard: bool,
}

#[derive(Debug)]
struct DocumentState {
    root: MemoryElement,
    body: MemoryElement,
    /// Every element created through the document, in document order.
    elements: Vec<MemoryElement>,
    shown_modals: Vec<ShownModal>,
    modal_library_loaded: bool,
}

/// A flat in-memory document. Elements created with [`MemoryDocument::create`]
/// are searchable; blocks appended through
/// [`ElementHandle::append_text_block`] are only reachable via
/// [`MemoryElement::children`].
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    state: Rc<RefCell<DocumentState>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let root = MemoryElement::new("html");
        let body = MemoryElement::new("body");
        Self {
            state: Rc::new(RefCell::new(DocumentState {
                root: root.clone(),
                body: body.clone(),
                elements: vec![root, body],
                shown_modals: Vec::new(),
                modal_library_loaded: true,
            })),
        }
    }

    /// Create an element and attach it to the document.
    pub fn create(&self, tag: &str) -> MemoryElement {
        let element = MemoryElement::new(tag);
        self.state.borrow_mut().elements.push(element.clone());
        element
    }

    pub fn root_element(&self) -> MemoryElement {
        self.state.borrow().root.clone()
    }

    pub fn body_element(&self) -> MemoryElement {
        self.state.borrow().body.clone()
    }

    pub fn shown_modals(&self) -> Vec<ShownModal> {
        self.state.borrow().shown_modals.clone()
    }

    /// Simulate a page where the modal library script failed to load.
    pub fn unload_modal_library(&self) {
        self.state.borrow_mut().modal_library_loaded = false;
    }

    fn live_elements(&self) -> Vec<MemoryElement> {
        self.state
            .borrow()
            .elements
            .iter()
            .filter(|element| !element.is_removed())
            .cloned()
            .collect()
    }
}

impl ElementLookup for MemoryDocument {
    type Element = MemoryElement;

    fn root(&self) -> Option<MemoryElement> {
        Some(self.root_element())
    }

    fn body(&self) -> Option<MemoryElement> {
        Some(self.body_element())
    }

    fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        self.live_elements()
            .into_iter()
            .find(|element| element.id().as_deref() == Some(id))
    }

    fn query_selector(&self, selector: &str) -> Result<Option<MemoryElement>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<MemoryElement>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .live_elements()
            .into_iter()
            .filter(|element| selector.matches(element))
            .collect())
    }

    fn show_modal(&self, modal: &MemoryElement, keyboard: bool) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.modal_library_loaded {
            return Err(StorefrontError::Dom("bootstrap is not defined".to_string()));
        }
        state.shown_modals.push(ShownModal {
            modal: modal.clone(),
            keyboard,
        });
        Ok(())
    }
}

// ============================================================================
// Selectors
// ============================================================================

#[derive(Debug, Default, PartialEq)]
struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attribute: Option<AttributeMatch>,
}

#[derive(Debug, PartialEq)]
enum AttributeMatch {
    Present(String),
    Equals(String, String),
    Prefix(String, String),
}

fn invalid_selector(selector: &str) -> StorefrontError {
    StorefrontError::Dom(format!("'{selector}' is not a valid selector"))
}

fn is_marker(c: char) -> bool {
    c == '#' || c == '.'
}

fn is_ident(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

impl AttributeMatch {
    fn parse(inner: &str) -> Option<Self> {
        let parsed = if let Some((name, value)) = inner.split_once("^=") {
            AttributeMatch::Prefix(name.trim().to_string(), unquote(value).to_string())
        } else if let Some((name, value)) = inner.split_once('=') {
            AttributeMatch::Equals(name.trim().to_string(), unquote(value).to_string())
        } else {
            AttributeMatch::Present(inner.trim().to_string())
        };
        is_ident(parsed.name()).then_some(parsed)
    }

    fn name(&self) -> &str {
        match self {
            AttributeMatch::Present(name)
            | AttributeMatch::Equals(name, _)
            | AttributeMatch::Prefix(name, _) => name,
        }
    }

    fn matches(&self, element: &MemoryElement) -> bool {
        let value = element.attribute(self.name());
        match self {
            AttributeMatch::Present(_) => value.is_some(),
            AttributeMatch::Equals(_, expected) => value.as_deref() == Some(expected.as_str()),
            AttributeMatch::Prefix(_, prefix) => {
                value.map_or(false, |value| value.starts_with(prefix.as_str()))
            }
        }
    }
}

impl Selector {
    fn parse(selector: &str) -> Result<Self> {
        let trimmed = selector.trim();
        let (head, attribute) = match trimmed.find('[') {
            Some(open) => {
                let inner = trimmed[open + 1..]
                    .strip_suffix(']')
                    .ok_or_else(|| invalid_selector(selector))?;
                let attribute =
                    AttributeMatch::parse(inner).ok_or_else(|| invalid_selector(selector))?;
                (&trimmed[..open], Some(attribute))
            }
            None => (trimmed, None),
        };

        if head.is_empty() && attribute.is_none() {
            return Err(invalid_selector(selector));
        }

        let mut parsed = Selector {
            attribute,
            ..Selector::default()
        };

        let tag_end = head.find(is_marker).unwrap_or(head.len());
        let tag = &head[..tag_end];
        if !tag.is_empty() {
            if !is_ident(tag) {
                return Err(invalid_selector(selector));
            }
            parsed.tag = Some(tag.to_ascii_lowercase());
        }

        let mut rest = &head[tag_end..];
        while let Some(marker) = rest.chars().next() {
            let body = &rest[marker.len_utf8()..];
            let end = body.find(is_marker).unwrap_or(body.len());
            let name = &body[..end];
            if !is_ident(name) {
                return Err(invalid_selector(selector));
            }
            if marker == '#' {
                parsed.id = Some(name.to_string());
            } else {
                parsed.classes.push(name.to_string());
            }
            rest = &body[end..];
        }

        Ok(parsed)
    }

    fn matches(&self, element: &MemoryElement) -> bool {
        if let Some(tag) = &self.tag {
            if element.tag() != *tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id().as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attribute
            .as_ref()
            .map_or(true, |attribute| attribute.matches(element))
    }
}
