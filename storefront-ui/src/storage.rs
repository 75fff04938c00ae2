//! Key-value storage capability.
//!
//! The browser's `localStorage` is wrapped by [`crate::web::BrowserStorage`];
//! `MemoryStorage` stands in for it in tests (`test-support` feature).

#[cfg(any(test, feature = "test-support"))]
use std::{cell::RefCell, collections::HashMap, rc::Rc};

#[cfg(any(test, feature = "test-support"))]
use crate::error::StorefrontError;
use crate::error::Result;

pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
struct MemoryStorageState {
    items: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

#[cfg(any(test, feature = "test-support"))]
/// In-memory storage. Clones share the same underlying map, so a test can
/// keep a handle while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Rc<RefCell<MemoryStorageState>>,
}

#[cfg(any(test, feature = "test-support"))]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.state
            .borrow_mut()
            .items
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn item(&self, key: &str) -> Option<String> {
        self.state.borrow().items.get(key).cloned()
    }

    /// Make every subsequent read fail, like a browser that denies access.
    pub fn fail_reads(&self, fail: bool) {
        self.state.borrow_mut().fail_reads = fail;
    }

    /// Make every subsequent write fail, like a full quota.
    pub fn fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(StorefrontError::Storage(format!("read of '{key}' denied")));
        }
        Ok(state.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(StorefrontError::Storage(format!("quota exceeded writing '{key}'")));
        }
        state.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
