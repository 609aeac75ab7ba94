//! Document-level listeners installed on every portal page
//!
//! [`install_page_bootstrap`] waits for the document to be parsed, then
//! adds a `keydown` listener for the search and modal shortcuts and a
//! `submit` listener that marks the submit button as loading. Every listener
//! is owned by the returned [`PageBindings`]; dropping it or calling
//! [`PageBindings::teardown`] detaches them, so re-running the bootstrap
//! never stacks duplicate handlers.

use crate::notification::{
    PermissionState, notification_permission, request_notification_permission,
};
use gloo::events::{EventListener, EventListenerOptions};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlFormElement, KeyboardEvent,
};

/// Inputs focused by Ctrl/Cmd+K
pub const SEARCH_INPUT_SELECTOR: &str = r#"input[type="search"], input[placeholder*="search"]"#;

/// An open modal dialog
pub const OPEN_MODAL_SELECTOR: &str = ".modal.show";

/// Submit button looked up inside a submitted form
pub const SUBMIT_BUTTON_SELECTOR: &str = r#"button[type="submit"]"#;

/// Class added to a submit button while its form is in flight
pub const LOADING_CLASS: &str = "loading";

/// Callback run when Escape is pressed with a modal open
pub type ModalEscapeHook = Rc<dyn Fn(&Element)>;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("No browser document available")]
    NoDocument,
}

/// Keyboard shortcut recognised by the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl+K or Cmd+K
    FocusSearch,
    /// Escape
    CloseModal,
}

impl Shortcut {
    /// Match a `KeyboardEvent.key` value and its modifier state
    pub fn from_key(key: &str, ctrl: bool, meta: bool) -> Option<Self> {
        match key {
            "k" if ctrl || meta => Some(Self::FocusSearch),
            "Escape" => Some(Self::CloseModal),
            _ => None,
        }
    }
}

/// Selectors and hooks used by the page listeners
#[derive(Clone)]
pub struct BootstrapOptions {
    pub search_selector: String,
    pub modal_selector: String,
    pub submit_selector: String,
    pub loading_class: String,
    /// Ask for notification permission on first visit
    pub prompt_notifications: bool,
    on_modal_escape: Option<ModalEscapeHook>,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            search_selector: SEARCH_INPUT_SELECTOR.to_string(),
            modal_selector: OPEN_MODAL_SELECTOR.to_string(),
            submit_selector: SUBMIT_BUTTON_SELECTOR.to_string(),
            loading_class: LOADING_CLASS.to_string(),
            prompt_notifications: true,
            on_modal_escape: None,
        }
    }
}

impl BootstrapOptions {
    /// Register the action taken when Escape is pressed over an open modal.
    ///
    /// Without a hook the key press is ignored.
    #[must_use]
    pub fn on_modal_escape(mut self, hook: impl Fn(&Element) + 'static) -> Self {
        self.on_modal_escape = Some(Rc::new(hook));
        self
    }

    pub fn has_modal_escape_hook(&self) -> bool {
        self.on_modal_escape.is_some()
    }
}

impl fmt::Debug for BootstrapOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapOptions")
            .field("search_selector", &self.search_selector)
            .field("modal_selector", &self.modal_selector)
            .field("submit_selector", &self.submit_selector)
            .field("loading_class", &self.loading_class)
            .field("prompt_notifications", &self.prompt_notifications)
            .field("on_modal_escape", &self.on_modal_escape.is_some())
            .finish()
    }
}

/// Handle owning every listener installed by [`install_page_bootstrap`]
#[derive(Debug, Default)]
pub struct PageBindings {
    listeners: Rc<RefCell<Vec<EventListener>>>,
}

impl PageBindings {
    /// Detach every listener; safe to call more than once
    pub fn teardown(&self) {
        let removed = self.listeners.borrow_mut().drain(..).count();
        if removed > 0 {
            debug!(removed, "Page listeners detached");
        }
    }

    /// Number of listeners currently attached
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

/// Install the page listeners, deferring to `DOMContentLoaded` while the
/// document is still loading.
pub fn install_page_bootstrap(options: BootstrapOptions) -> Result<PageBindings, BootstrapError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(BootstrapError::NoDocument)?;
    let options = Rc::new(options);
    let bindings = PageBindings::default();

    if document.ready_state() == "loading" {
        let listeners = Rc::downgrade(&bindings.listeners);
        let target = document.clone();
        let ready = EventListener::once(&document, "DOMContentLoaded", move |_| {
            on_ready(&target, &options, &listeners);
        });
        bindings.listeners.borrow_mut().push(ready);
    } else {
        on_ready(&document, &options, &Rc::downgrade(&bindings.listeners));
    }

    Ok(bindings)
}

fn on_ready(
    document: &Document,
    options: &Rc<BootstrapOptions>,
    listeners: &Weak<RefCell<Vec<EventListener>>>,
) {
    // Torn down before the document finished loading
    let Some(listeners) = listeners.upgrade() else {
        return;
    };

    if options.prompt_notifications && notification_permission() == Some(PermissionState::Default) {
        wasm_bindgen_futures::spawn_local(async {
            request_notification_permission().await;
        });
    }

    let keydown = {
        let target = document.clone();
        let options = Rc::clone(options);
        EventListener::new_with_options(
            document,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| on_keydown(&target, &options, event),
        )
    };

    let submit = {
        let options = Rc::clone(options);
        EventListener::new(document, "submit", move |event| on_submit(&options, event))
    };

    listeners.borrow_mut().extend([keydown, submit]);
    debug!("Page listeners attached");
}

fn on_keydown(document: &Document, options: &BootstrapOptions, event: &Event) {
    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
        return;
    };

    match Shortcut::from_key(&event.key(), event.ctrl_key(), event.meta_key()) {
        Some(Shortcut::FocusSearch) => {
            event.prevent_default();
            let search = find(document, &options.search_selector)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            if let Some(Err(e)) = search.map(|search| search.focus()) {
                debug!(error = ?e, "Could not focus search input");
            }
        }
        Some(Shortcut::CloseModal) => {
            if let (Some(hook), Some(modal)) = (
                options.on_modal_escape.as_ref(),
                find(document, &options.modal_selector),
            ) {
                hook(&modal);
            }
        }
        None => {}
    }
}

fn on_submit(options: &BootstrapOptions, event: &Event) {
    let Some(form) = event
        .target()
        .and_then(|target| target.dyn_into::<HtmlFormElement>().ok())
    else {
        return;
    };

    let Some(button) = form
        .query_selector(&options.submit_selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
    else {
        return;
    };

    if button.disabled() {
        return;
    }
    if let Err(e) = button.class_list().add_1(&options.loading_class) {
        debug!(error = ?e, "Could not mark submit button as loading");
    }
}

fn find(document: &Document, selector: &str) -> Option<Element> {
    match document.query_selector(selector) {
        Ok(found) => found,
        Err(e) => {
            warn!(selector, error = ?e, "Invalid selector");
            None
        }
    }
}
