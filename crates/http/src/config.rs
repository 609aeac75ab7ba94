//! Client configuration
//!
//! A [`ClientConfig`] is assembled once and then only read. Pages that need
//! different values pass a JSON [`ClientSettings`] override at startup.

use crate::client::error::ClientError;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Request timeout applied to every call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Route the browser is sent to when the session is rejected
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Storage key holding the bearer token
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Storage key holding the serialized user record
pub const DEFAULT_USER_KEY: &str = "user";

/// Prefix of every API route
pub const API_PREFIX: &str = "/api/v1";

const DEFAULT_USER_AGENT: &str = concat!("ldap-portal/", env!("CARGO_PKG_VERSION"));

/// Immutable client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    default_headers: HeaderMap,
    login_path: String,
    token_key: String,
    user_key: String,
    user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            base_url: String::new(),
            timeout: DEFAULT_TIMEOUT,
            default_headers,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            user_key: DEFAULT_USER_KEY.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Build a configuration from a settings override
    pub fn from_settings(settings: ClientSettings) -> Result<Self, ClientError> {
        let mut builder = Self::builder();
        if let Some(base_url) = settings.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(timeout_ms) = settings.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        if let Some(login_path) = settings.login_path {
            builder = builder.login_path(login_path);
        }
        if let Some(token_key) = settings.token_key {
            builder = builder.token_key(token_key);
        }
        if let Some(user_key) = settings.user_key {
            builder = builder.user_key(user_key);
        }
        for (name, value) in settings.headers {
            builder = builder.header(name, value);
        }
        builder.build()
    }

    /// Parse a JSON settings override
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        Self::from_settings(serde_json::from_str(json)?)
    }

    /// Copy of this configuration pointed at another origin
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(base_url.into());
        self
    }

    /// Base URL every request path is appended to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request timeout
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Headers sent with every request
    pub const fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Login route used for redirects
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Storage key of the bearer token
    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    /// Storage key of the user record
    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    /// User agent reported by the client
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Full URL of an API route
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url)
    }
}

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    login_path: Option<String>,
    token_key: Option<String>,
    user_key: Option<String>,
    user_agent: Option<String>,
    headers: Vec<(String, String)>,
}

impl ClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the login route
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    /// Set the storage key of the bearer token
    pub fn token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = Some(key.into());
        self
    }

    /// Set the storage key of the user record
    pub fn user_key(mut self, key: impl Into<String>) -> Self {
        self.user_key = Some(key.into());
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Add or replace a default header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let mut config = ClientConfig::default();

        if let Some(base_url) = self.base_url {
            config.base_url = normalize_base_url(base_url);
        }
        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(ClientError::Configuration(
                    "timeout must be greater than zero".into(),
                ));
            }
            config.timeout = timeout;
        }
        if let Some(login_path) = self.login_path {
            if !login_path.starts_with('/') {
                return Err(ClientError::Configuration(format!(
                    "login path must start with '/': {login_path}"
                )));
            }
            config.login_path = login_path;
        }
        if let Some(token_key) = self.token_key {
            config.token_key = token_key;
        }
        if let Some(user_key) = self.user_key {
            config.user_key = user_key;
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }

        for (name, value) in self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ClientError::Configuration(format!("invalid header name '{name}': {e}"))
            })?;
            let header_value = HeaderValue::from_str(&value).map_err(|e| {
                ClientError::Configuration(format!("invalid value for header '{name}': {e}"))
            })?;
            config.default_headers.insert(header_name, header_value);
        }

        Ok(config)
    }
}

/// Settings override, typically embedded in the page as JSON
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub login_path: Option<String>,
    pub token_key: Option<String>,
    pub user_key: Option<String>,
    pub headers: BTreeMap<String, String>,
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
