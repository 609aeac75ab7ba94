//! [`Host`] backed by the real page

use portal_http::Host;
use web_sys::Storage;

/// `localStorage` and `window.location` of the current page.
///
/// Storage can be missing (private browsing, sandboxed frames). Reads then
/// return nothing and writes are dropped with a warning.
#[derive(Debug, Clone)]
pub struct BrowserHost {
    storage: Option<Storage>,
}

impl BrowserHost {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            warn!("localStorage is not available, session will not persist");
        }
        Self { storage }
    }

    /// Origin of the page, e.g. `https://portal.example.com`
    pub fn origin() -> Option<String> {
        web_sys::window().and_then(|w| w.location().origin().ok())
    }
}

impl Default for BrowserHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for BrowserHost {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) {
        let Some(storage) = &self.storage else {
            warn!(key, "Dropping write, no storage");
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            warn!(key, error = ?e, "Failed to write to localStorage");
        }
    }

    fn remove_item(&self, key: &str) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(e) = storage.remove_item(key) {
            warn!(key, error = ?e, "Failed to remove from localStorage");
        }
    }

    fn pathname(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_default()
    }

    fn navigate(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().set_href(path) {
            error!(path, error = ?e, "Navigation failed");
        }
    }
}
