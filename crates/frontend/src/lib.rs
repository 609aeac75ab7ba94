//! Browser glue for the LDAP self-service portal
//!
//! Everything a server-rendered page needs beyond its markup: the API client
//! wired to `localStorage`, clipboard and notification helpers, and the
//! document-level keyboard and form listeners. [`js_api`] exposes the same
//! helpers to page scripts.

#[macro_use]
extern crate tracing;

pub mod app;
pub mod bootstrap;
pub mod clipboard;
pub mod host;
pub mod js_api;
pub mod logging;
pub mod notification;

pub use app::{App, AppError};
pub use bootstrap::{
    BootstrapError, BootstrapOptions, PageBindings, Shortcut, install_page_bootstrap,
};
pub use clipboard::{ClipboardError, copy_to_clipboard};
pub use host::BrowserHost;
pub use logging::init_logging;
pub use notification::{
    NotificationKind, PermissionState, notification_permission, request_notification_permission,
    show_notification,
};
