//! Session handling middleware
//!
//! [`BearerAuth`] attaches the stored token to outgoing requests.
//! [`SessionExpiry`] reacts to a 401 by dropping the stored session and
//! sending the browser to the login page.

use super::{Effect, EffectLog, RequestInterceptor, ResponseInterceptor};
use crate::client::error::ClientError;
use crate::config::ClientConfig;
use crate::host::Host;
use reqwest::Request;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// Adds `Authorization: Bearer <token>` when a token is stored
#[derive(Debug, Clone)]
pub struct BearerAuth {
    token_key: String,
}

impl BearerAuth {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            token_key: config.token_key().to_string(),
        }
    }
}

impl RequestInterceptor for BearerAuth {
    fn on_request(&self, request: &mut Request, host: &dyn Host) -> Result<(), ClientError> {
        let Some(token) = host.get_item(&self.token_key).filter(|t| !t.is_empty()) else {
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            ClientError::Configuration(format!("stored token is not a valid header value: {e}"))
        })?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);

        debug!(url = %request.url(), "Attached bearer token");
        Ok(())
    }
}

/// Clears the session and redirects to login when the server answers 401
#[derive(Debug, Clone)]
pub struct SessionExpiry {
    token_key: String,
    user_key: String,
    login_path: String,
}

impl SessionExpiry {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            token_key: config.token_key().to_string(),
            user_key: config.user_key().to_string(),
            login_path: config.login_path().to_string(),
        }
    }
}

impl ResponseInterceptor for SessionExpiry {
    fn on_error(&self, error: &ClientError, host: &dyn Host, effects: &mut EffectLog) {
        if !error.is_auth_expired() {
            return;
        }

        warn!("Session rejected by server, clearing stored credentials");
        effects.push(Effect::RemoveItem(self.token_key.clone()));
        effects.push(Effect::RemoveItem(self.user_key.clone()));

        if host.pathname() != self.login_path {
            effects.push(Effect::Navigate(self.login_path.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use reqwest::{Method, StatusCode, Url};

    fn request() -> Request {
        Request::new(Method::GET, Url::parse("http://localhost/api/v1/ssh-keys").unwrap())
    }

    fn unauthorized() -> ClientError {
        ClientError::from_status(StatusCode::UNAUTHORIZED, "Invalid token".into())
    }

    #[test]
    fn test_bearer_token_attached() {
        let config = ClientConfig::default();
        let host = MemoryHost::new().with_item("token", "abc.def");
        let mut request = request();

        BearerAuth::new(&config)
            .on_request(&mut request, &host)
            .unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer abc.def"
        );
    }

    #[test]
    fn test_no_token_leaves_request_alone() {
        let config = ClientConfig::default();
        let host = MemoryHost::new();
        let mut request = request();

        BearerAuth::new(&config)
            .on_request(&mut request, &host)
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let config = ClientConfig::default();
        let host = MemoryHost::new().with_item("token", "");
        let mut request = request();

        BearerAuth::new(&config)
            .on_request(&mut request, &host)
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_custom_token_key() {
        let config = ClientConfig::builder().token_key("jwt").build().unwrap();
        let host = MemoryHost::new()
            .with_item("token", "wrong")
            .with_item("jwt", "right");
        let mut request = request();

        BearerAuth::new(&config)
            .on_request(&mut request, &host)
            .unwrap();
        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "Bearer right");
    }

    #[test]
    fn test_unprintable_token_is_rejected() {
        let config = ClientConfig::default();
        let host = MemoryHost::new().with_item("token", "abc\ndef");
        let mut request = request();

        let result = BearerAuth::new(&config).on_request(&mut request, &host);
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn test_401_clears_session_and_redirects() {
        let config = ClientConfig::default();
        let host = MemoryHost::at_path("/dashboard");
        let mut effects = EffectLog::new();

        SessionExpiry::new(&config).on_error(&unauthorized(), &host, &mut effects);
        assert_eq!(
            effects.effects(),
            &[
                Effect::RemoveItem("token".into()),
                Effect::RemoveItem("user".into()),
                Effect::Navigate("/login".into()),
            ]
        );
    }

    #[test]
    fn test_401_on_login_page_does_not_redirect() {
        let config = ClientConfig::default();
        let host = MemoryHost::at_path("/login");
        let mut effects = EffectLog::new();

        SessionExpiry::new(&config).on_error(&unauthorized(), &host, &mut effects);
        assert_eq!(
            effects.effects(),
            &[
                Effect::RemoveItem("token".into()),
                Effect::RemoveItem("user".into()),
            ]
        );
    }

    #[test]
    fn test_other_failures_have_no_effects() {
        let config = ClientConfig::default();
        let host = MemoryHost::at_path("/dashboard");
        let expiry = SessionExpiry::new(&config);

        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            let mut effects = EffectLog::new();
            let error = ClientError::from_status(status, String::new());
            expiry.on_error(&error, &host, &mut effects);
            assert!(effects.is_empty(), "{status}");
        }
    }
}
