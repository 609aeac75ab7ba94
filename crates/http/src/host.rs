//! Access to the browser state the client depends on
//!
//! The page keeps the session in a key-value store and the middleware needs
//! to read the current path and trigger navigation. [`Host`] is the seam:
//! the frontend implements it over `localStorage` and `window.location`,
//! while [`MemoryHost`] keeps everything in memory.

use std::cell::RefCell;
use std::collections::HashMap;

/// Key-value storage plus location of the running page
pub trait Host {
    /// Read a stored value
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store a value
    fn set_item(&self, key: &str, value: &str);

    /// Delete a stored value
    fn remove_item(&self, key: &str);

    /// Path of the current page, e.g. `/dashboard`
    fn pathname(&self) -> String;

    /// Perform a full-page navigation
    fn navigate(&self, path: &str);
}

/// In-memory [`Host`] that records navigations
#[derive(Debug, Default)]
pub struct MemoryHost {
    items: RefCell<HashMap<String, String>>,
    path: RefCell<String>,
    navigations: RefCell<Vec<String>>,
}

impl MemoryHost {
    /// Create an empty host positioned at `/`
    pub fn new() -> Self {
        Self::at_path("/")
    }

    /// Create an empty host positioned at `path`
    pub fn at_path(path: impl Into<String>) -> Self {
        Self {
            path: RefCell::new(path.into()),
            ..Self::default()
        }
    }

    /// Seed a stored value
    #[must_use]
    pub fn with_item(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.borrow_mut().insert(key.into(), value.into());
        self
    }

    /// Every path passed to [`Host::navigate`], oldest first
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    /// Whether a value is stored under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }
}

impl Host for MemoryHost {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }

    fn pathname(&self) -> String {
        self.path.borrow().clone()
    }

    fn navigate(&self, path: &str) {
        *self.path.borrow_mut() = path.to_string();
        self.navigations.borrow_mut().push(path.to_string());
    }
}
