//! Functions exported to page scripts
//!
//! Inputs arrive as loose JavaScript values. Missing or non-string inputs are
//! treated as empty rather than thrown on, so the helpers can be called
//! straight from form handlers.

use crate::app::App;
use crate::bootstrap::BootstrapOptions;
use crate::logging::init_logging;
use crate::notification::NotificationKind;
use chrono::{DateTime, Utc};
use portal_core::format::{INVALID_DATE, NEVER};
use portal_core::{
    SshKeyValidation, format_date_local, format_date_str, format_relative_time,
    format_relative_time_str, from_epoch_millis, password_strength, validate_password,
    validate_ssh_key,
};
use portal_http::{ClientConfig, ClientSettings};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::Level;
use wasm_bindgen::prelude::*;

/// Startup settings accepted by [`start`]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PageSettings {
    client: ClientSettings,
    log_level: Option<String>,
    search_selector: Option<String>,
    modal_selector: Option<String>,
    submit_selector: Option<String>,
    loading_class: Option<String>,
    prompt_notifications: Option<bool>,
}

impl PageSettings {
    fn bootstrap_options(&self) -> BootstrapOptions {
        let mut options = BootstrapOptions::default();
        if let Some(selector) = &self.search_selector {
            options.search_selector.clone_from(selector);
        }
        if let Some(selector) = &self.modal_selector {
            options.modal_selector.clone_from(selector);
        }
        if let Some(selector) = &self.submit_selector {
            options.submit_selector.clone_from(selector);
        }
        if let Some(class) = &self.loading_class {
            options.loading_class.clone_from(class);
        }
        if let Some(prompt) = self.prompt_notifications {
            options.prompt_notifications = prompt;
        }
        options
    }
}

/// Date argument as the page may pass it
enum DateArg {
    Missing,
    Instant(DateTime<Utc>),
    Text(String),
    Invalid,
}

impl DateArg {
    fn from_js(value: &JsValue) -> Self {
        if value.is_falsy() {
            return Self::Missing;
        }
        if let Some(date) = value.dyn_ref::<js_sys::Date>() {
            return Self::from_millis(date.get_time());
        }
        if let Some(millis) = value.as_f64() {
            return Self::from_millis(millis);
        }
        value.as_string().map_or(Self::Invalid, Self::Text)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_millis(millis: f64) -> Self {
        if !millis.is_finite() {
            return Self::Invalid;
        }
        from_epoch_millis(millis as i64).map_or(Self::Invalid, Self::Instant)
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(Into::into)
}

fn js_error(error: impl Display) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

#[wasm_bindgen(js_name = formatDate)]
pub fn format_date(date: JsValue) -> String {
    match DateArg::from_js(&date) {
        DateArg::Missing => NEVER.to_string(),
        DateArg::Instant(date) => format_date_local(Some(date)),
        DateArg::Text(text) => format_date_str(&text),
        DateArg::Invalid => INVALID_DATE.to_string(),
    }
}

#[wasm_bindgen(js_name = formatRelativeTime)]
pub fn relative_time(date: JsValue) -> String {
    match DateArg::from_js(&date) {
        DateArg::Missing => NEVER.to_string(),
        DateArg::Instant(date) => format_relative_time(Some(date)),
        DateArg::Text(text) => format_relative_time_str(&text),
        DateArg::Invalid => INVALID_DATE.to_string(),
    }
}

/// `{ valid, error? }`
#[wasm_bindgen(js_name = validateSSHKey)]
pub fn ssh_key_check(key: JsValue) -> Result<JsValue, JsValue> {
    let key = key.as_string().unwrap_or_default();
    to_js(&SshKeyValidation::from(validate_ssh_key(&key)))
}

/// `{ valid, errors, strength? }`
#[wasm_bindgen(js_name = validatePassword)]
pub fn password_check(password: JsValue) -> Result<JsValue, JsValue> {
    let password = password.as_string().unwrap_or_default();
    to_js(&validate_password(&password))
}

#[wasm_bindgen(js_name = calculatePasswordStrength)]
pub fn strength(password: JsValue) -> u8 {
    password_strength(&password.as_string().unwrap_or_default())
}

#[wasm_bindgen(js_name = copyToClipboard)]
pub async fn copy_text(text: String) -> bool {
    crate::clipboard::copy_to_clipboard(&text).await
}

/// `kind` is one of `info`, `success`, `warning`, `error`; anything else is
/// shown as `info`.
#[wasm_bindgen(js_name = showNotification)]
pub fn notify(title: &str, message: &str, kind: Option<String>) {
    let kind = match kind.as_deref().map(str::parse::<NotificationKind>) {
        Some(Ok(kind)) => kind,
        Some(Err(e)) => {
            debug!(error = %e, "Using info notification");
            NotificationKind::Info
        }
        None => NotificationKind::Info,
    };
    crate::notification::show_notification(title, message, kind);
}

#[wasm_bindgen(js_name = requestNotificationPermission)]
pub async fn request_permission() -> bool {
    crate::notification::request_notification_permission().await
}

/// Handle returned by [`start`]
#[wasm_bindgen]
pub struct PortalApp {
    app: App,
}

#[wasm_bindgen]
impl PortalApp {
    /// Detach the page listeners
    pub fn teardown(&self) {
        self.app.teardown();
    }

    #[wasm_bindgen(js_name = isAuthenticated)]
    pub fn is_authenticated(&self) -> bool {
        self.app.client().is_authenticated()
    }

    pub fn logout(&self) {
        self.app.client().logout();
    }
}

/// Start the page: logging, API client and document listeners.
///
/// `settings` is an optional object such as
/// `{ logLevel: "debug", client: { timeoutMs: 5000 }, loadingClass: "busy" }`.
/// `on_modal_escape` receives the open modal element when Escape is pressed.
#[wasm_bindgen]
pub fn start(
    settings: JsValue,
    on_modal_escape: Option<js_sys::Function>,
) -> Result<PortalApp, JsValue> {
    console_error_panic_hook::set_once();

    let settings: PageSettings = if settings.is_undefined() || settings.is_null() {
        PageSettings::default()
    } else {
        serde_wasm_bindgen::from_value(settings)?
    };

    let level = settings
        .log_level
        .as_deref()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    init_logging(level);

    let mut options = settings.bootstrap_options();
    if let Some(callback) = on_modal_escape {
        options = options.on_modal_escape(move |modal| {
            if let Err(e) = callback.call1(&JsValue::NULL, modal) {
                warn!(error = ?e, "Modal escape callback threw");
            }
        });
    }

    let config = ClientConfig::from_settings(settings.client).map_err(js_error)?;
    let app = App::start(config, options).map_err(js_error)?;
    Ok(PortalApp { app })
}
