//! Desktop notifications
//!
//! All helpers degrade to no-ops when the `Notification` API is absent.

use js_sys::Reflect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Notification, NotificationOptions, NotificationPermission};

/// Icon shown with every notification
pub const NOTIFICATION_ICON: &str = "/static/icon.png";

/// Category of a notification, also used as its tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown notification kind: {other}")),
        }
    }
}

/// Whether the user allowed notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Never asked
    Default,
    Granted,
    Denied,
}

impl PermissionState {
    /// Map a permission string; anything unrecognised counts as denied
    pub fn from_permission(value: &str) -> Self {
        match value {
            "default" => Self::Default,
            "granted" => Self::Granted,
            _ => Self::Denied,
        }
    }
}

impl From<NotificationPermission> for PermissionState {
    fn from(permission: NotificationPermission) -> Self {
        match permission {
            NotificationPermission::Default => Self::Default,
            NotificationPermission::Granted => Self::Granted,
            _ => Self::Denied,
        }
    }
}

fn notifications_supported() -> bool {
    web_sys::window()
        .is_some_and(|w| Reflect::has(&w, &JsValue::from_str("Notification")).unwrap_or(false))
}

/// Current permission, or `None` when the API is absent
pub fn notification_permission() -> Option<PermissionState> {
    notifications_supported().then(|| Notification::permission().into())
}

/// Show a notification if permission was already granted.
///
/// Never prompts; see [`request_notification_permission`].
pub fn show_notification(title: &str, message: &str, kind: NotificationKind) {
    if notification_permission() != Some(PermissionState::Granted) {
        debug!(title, "Notifications not granted, skipping");
        return;
    }

    let options = NotificationOptions::new();
    options.set_body(message);
    options.set_icon(NOTIFICATION_ICON);
    options.set_tag(kind.tag());

    if let Err(e) = Notification::new_with_options(title, &options) {
        warn!(error = ?e, "Failed to create notification");
    }
}

/// Ask the user for permission; true iff it was granted
pub async fn request_notification_permission() -> bool {
    if !notifications_supported() {
        return false;
    }

    let promise = match Notification::request_permission() {
        Ok(promise) => promise,
        Err(e) => {
            warn!(error = ?e, "Notification permission request failed");
            return false;
        }
    };

    match JsFuture::from(promise).await {
        Ok(answer) => {
            let state = PermissionState::from_permission(&answer.as_string().unwrap_or_default());
            info!(?state, "Notification permission answered");
            state == PermissionState::Granted
        }
        Err(e) => {
            warn!(error = ?e, "Notification permission request rejected");
            false
        }
    }
}
